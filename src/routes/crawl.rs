use axum::extract::{Query, State};
use serde::Deserialize;

use crate::crawler::ListingKind;
use crate::crawler::runner::CrawlRequest;
use crate::error::AppError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct CrawlQuery {
    pub pages: Option<String>,
    pub keyword: Option<String>,
    pub profile: Option<String>,
}

/// GET /crawl?pages=&keyword=&profile=
///
/// Runs one crawl to completion and answers in plain text. Dropped pages
/// or listings do not change the response.
pub async fn trigger(
    State(state): State<AppState>,
    Query(query): Query<CrawlQuery>,
) -> Result<String, AppError> {
    let profile = match query.profile.as_deref().map(str::trim) {
        None | Some("") => ListingKind::Recruit,
        Some(name) => ListingKind::parse(name)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown profile '{name}'")))?,
    };

    let request = CrawlRequest::new(profile, query.keyword, coerce_pages(query.pages.as_deref()));
    let result = state.crawler.run_crawl(&request).await?;

    Ok(format!(
        "Crawl completed and data saved: {} records.",
        result.records_persisted
    ))
}

/// Leading-digit parse of a page count, optionally signed with `+`; zero or
/// unparsable means "use the default".
pub fn coerce_pages(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let digits_end = raw
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(raw.len(), |(i, _)| i);
    raw[..digits_end].parse::<u32>().ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::crawler::fetcher::testing::ScriptedFetcher;
    use crate::crawler::runner::Crawler;
    use crate::crawler::saramin::fixtures::INTERN_PAGE;
    use crate::crawler::saramin::JobProfile;
    use crate::crawler::Profile;
    use crate::routes::router;
    use crate::sink::store::testing::MemoryStore;
    use crate::sink::{CsvSink, DbSink, Sink};

    fn app(fetcher: ScriptedFetcher, sink: Sink) -> axum::Router {
        let crawler = Crawler::new(Arc::new(fetcher), sink, 5).unwrap();
        router(AppState {
            crawler: Arc::new(crawler),
        })
    }

    async fn body_text(resp: axum::response::Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn pages_coerce_like_parse_int() {
        assert_eq!(coerce_pages(Some("3")), Some(3));
        assert_eq!(coerce_pages(Some(" 7abc")), Some(7));
        assert_eq!(coerce_pages(Some("+3")), Some(3));
        assert_eq!(coerce_pages(Some("+")), None);
        assert_eq!(coerce_pages(Some("abc")), None);
        assert_eq!(coerce_pages(Some("0")), None);
        assert_eq!(coerce_pages(Some("-2")), None);
        assert_eq!(coerce_pages(Some("")), None);
        assert_eq!(coerce_pages(None), None);
    }

    #[tokio::test(start_paused = true)]
    async fn successful_run_answers_plain_text() {
        let fetcher = ScriptedFetcher::new().page(JobProfile::intern().unwrap().page_url(1), INTERN_PAGE);
        let store = Arc::new(MemoryStore::default());
        let app = app(fetcher, Sink::Database(DbSink::new(store.clone())));

        let resp = app
            .oneshot(
                Request::get("/crawl?profile=intern&pages=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("1 records"));
        assert_eq!(store.rows_in("interns"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn persistence_failure_is_500_plain_text() {
        let dir = std::env::temp_dir().join(format!("jobboard-route-{}", uuid::Uuid::new_v4()));
        let fetcher = ScriptedFetcher::new().page(JobProfile::intern().unwrap().page_url(1), INTERN_PAGE);
        let app = app(fetcher, Sink::Csv(CsvSink::new(dir)));

        let resp = app
            .oneshot(
                Request::get("/api/crawl?profile=intern&pages=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(resp).await, "Error occurred while scraping.");
    }

    #[tokio::test]
    async fn unknown_profile_is_bad_request() {
        let app = app(
            ScriptedFetcher::new(),
            Sink::Database(DbSink::new(Arc::new(MemoryStore::default()))),
        );

        let resp = app
            .oneshot(
                Request::get("/crawl?profile=bookmarks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
