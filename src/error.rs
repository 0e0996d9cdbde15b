use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// A page or detail request that did not produce a usable body.
#[derive(Debug, thiserror::Error)]
#[error("Fetch of {url} failed: {kind}")]
pub struct FetchError {
    pub url: String,
    pub kind: FetchErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchErrorKind {
    #[error("request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),
}

impl FetchError {
    pub fn new(url: impl Into<String>, kind: impl Into<FetchErrorKind>) -> Self {
        Self {
            url: url.into(),
            kind: kind.into(),
        }
    }
}

/// One listing container whose markup did not have the expected shape.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("missing element '{0}'")]
    MissingElement(&'static str),

    #[error("missing attribute '{attr}' on '{selector}'")]
    MissingAttribute {
        selector: &'static str,
        attr: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("Invalid selector '{0}'")]
    Selector(&'static str),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Crawl(#[from] CrawlError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()).into_response(),
            AppError::Crawl(e) => {
                tracing::error!("Crawl failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error occurred while scraping.".to_string(),
                )
                    .into_response()
            }
        }
    }
}
