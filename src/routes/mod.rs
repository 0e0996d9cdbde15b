pub mod crawl;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::crawler::runner::Crawler;

#[derive(Clone)]
pub struct AppState {
    pub crawler: Arc<Crawler>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/crawl", get(crawl::trigger))
        .route("/api/crawl", get(crawl::trigger))
        .with_state(state)
}
