use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

use crate::error::{FetchError, FetchErrorKind};

/// The target site rejects default client identifiers, so every request
/// carries a desktop browser user agent.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Headers and limits shared by every request of a crawler.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: &'static str,
    pub accept: &'static str,
    pub accept_language: &'static str,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: BROWSER_USER_AGENT,
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            accept_language: "ko-KR,ko;q=0.9,en;q=0.8",
            timeout: Duration::from_secs(30),
        }
    }
}

/// A single GET returning the response body as text. No retries.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(config.accept));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(config.accept_language),
        );

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::new(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::new(url, FetchErrorKind::Status(status)));
        }

        resp.text().await.map_err(|e| FetchError::new(url, e))
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use tokio::time::Instant;

    use super::Fetch;
    use crate::error::{FetchError, FetchErrorKind};

    /// Serves canned bodies by URL and records every request.
    #[derive(Default)]
    pub struct ScriptedFetcher {
        pages: HashMap<String, Result<String, StatusCode>>,
        calls: Mutex<Vec<(String, Instant)>>,
    }

    impl ScriptedFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
            self.pages.insert(url.into(), Ok(body.into()));
            self
        }

        pub fn failing(mut self, url: impl Into<String>, status: StatusCode) -> Self {
            self.pages.insert(url.into(), Err(status));
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }

        /// Request instants for URLs containing `needle`, in call order.
        pub fn call_times(&self, needle: &str) -> Vec<Instant> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(url, _)| url.contains(needle))
                .map(|(_, at)| *at)
                .collect()
        }
    }

    #[async_trait]
    impl Fetch for ScriptedFetcher {
        async fn get(&self, url: &str) -> Result<String, FetchError> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), Instant::now()));
            match self.pages.get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(FetchError::new(url, FetchErrorKind::Status(*status))),
                None => Err(FetchError::new(
                    url,
                    FetchErrorKind::Status(StatusCode::NOT_FOUND),
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::get;

    async fn serve() -> String {
        let app = Router::new()
            .route(
                "/ua",
                get(|headers: AxumHeaders| async move {
                    headers
                        .get("user-agent")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string()
                }),
            )
            .route(
                "/blocked",
                get(|| async { (StatusCode::FORBIDDEN, "blocked") }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn sends_browser_user_agent() {
        let base = serve().await;
        let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();

        let body = fetcher.get(&format!("{base}/ua")).await.unwrap();
        assert_eq!(body, BROWSER_USER_AGENT);
    }

    #[tokio::test]
    async fn non_success_status_is_a_fetch_error() {
        let base = serve().await;
        let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
        let url = format!("{base}/blocked");

        let err = fetcher.get(&url).await.unwrap_err();
        assert_eq!(err.url, url);
        assert!(matches!(
            err.kind,
            FetchErrorKind::Status(s) if s == reqwest::StatusCode::FORBIDDEN
        ));
    }

    #[tokio::test]
    async fn connection_failure_carries_url() {
        let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
        let err = fetcher.get("http://127.0.0.1:1/").await.unwrap_err();
        assert_eq!(err.url, "http://127.0.0.1:1/");
        assert!(matches!(err.kind, FetchErrorKind::Transport(_)));
    }
}
