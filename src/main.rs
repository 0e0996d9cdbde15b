mod config;
mod crawler;
mod db;
mod error;
mod models;
mod routes;
mod sink;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::config::{Command, Config, SinkMode};
use crate::crawler::fetcher::{FetchConfig, HttpFetcher};
use crate::crawler::runner::{CrawlRequest, Crawler};
use crate::db::PgStore;
use crate::routes::AppState;
use crate::sink::{CsvSink, DbSink, Sink};

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn build_sink(config: &Config) -> anyhow::Result<Sink> {
    match config.sink {
        SinkMode::Csv => {
            tracing::info!("Writing CSV exports to {}", config.output_dir.display());
            Ok(Sink::Csv(CsvSink::new(config.output_dir.clone())))
        }
        SinkMode::Database => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the database sink")?;
            tracing::info!("Connecting to database...");
            let pool = db::create_pool(url).await?;
            Ok(Sink::Database(DbSink::new(Arc::new(PgStore::new(pool)))))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jobboard=info,tower_http=info")),
        )
        .init();

    let config = Config::parse();

    let fetcher = HttpFetcher::new(&FetchConfig::default())
        .context("Failed to build HTTP client")?;
    let sink = build_sink(&config).await?;
    let crawler = Arc::new(Crawler::new(
        Arc::new(fetcher),
        sink,
        config.detail_concurrency,
    )?);

    match config.resolved_command() {
        Command::Serve { listen_addr } => {
            let app = Router::new()
                .route("/healthz", get(healthz))
                .merge(routes::router(AppState { crawler }))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive());

            let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
            tracing::info!("Listening on {listen_addr}");
            axum::serve(listener, app).await?;
        }
        Command::Crawl {
            profile,
            keyword,
            pages,
        } => {
            let request = CrawlRequest::new(profile, keyword, pages);
            let result = crawler.run_crawl(&request).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
