use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::crawler::enricher::DetailEnricher;
use crate::crawler::fetcher::Fetch;
use crate::crawler::pager::{PageDelay, Pager, PagerOutput};
use crate::crawler::saramin::{CompanyProfile, JobProfile, StationProfile};
use crate::crawler::{ListingKind, Profile};
use crate::error::CrawlError;
use crate::sink::Sink;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub profile: ListingKind,
    pub keyword: Option<String>,
    pub pages: u32,
}

impl CrawlRequest {
    /// Fill in the listing type's default keyword and page count.
    pub fn new(profile: ListingKind, keyword: Option<String>, pages: Option<u32>) -> Self {
        let keyword = keyword
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .or_else(|| profile.default_keyword().map(String::from));
        Self {
            profile,
            keyword,
            pages: pages.unwrap_or_else(|| profile.default_pages()),
        }
    }

    fn keyword(&self) -> &str {
        self.keyword.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub profile: ListingKind,
    pub keyword: Option<String>,
    pub pages_requested: u32,
    pub failed_pages: Vec<u32>,
    pub records_found: usize,
    pub records_persisted: usize,
    pub persist_failures: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// One crawler instance serves every run; runs share nothing but the
/// HTTP client and the sink.
pub struct Crawler {
    fetcher: Arc<dyn Fetch>,
    enricher: DetailEnricher,
    pager: Pager,
    sink: Sink,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn Fetch>, sink: Sink, concurrency: usize) -> Result<Self, CrawlError> {
        Ok(Self {
            fetcher,
            enricher: DetailEnricher::new()?,
            pager: Pager::new(PageDelay::POLITE, concurrency),
            sink,
        })
    }

    /// Walk `pages` listing pages of `profile` without persisting.
    pub async fn collect<P: Profile>(&self, profile: &P, pages: u32) -> PagerOutput<P::Record> {
        self.pager
            .run(profile, &*self.fetcher, &self.enricher, pages)
            .await
    }

    pub async fn run_crawl(&self, request: &CrawlRequest) -> Result<RunResult, CrawlError> {
        match request.profile {
            ListingKind::Recruit => {
                let profile = JobProfile::recruit(request.keyword())?;
                self.execute(&profile, request).await
            }
            ListingKind::Intern => self.execute(&JobProfile::intern()?, request).await,
            ListingKind::Newcomer => self.execute(&JobProfile::newcomer()?, request).await,
            ListingKind::Station => self.execute(&StationProfile::new()?, request).await,
            ListingKind::Company => {
                let profile = CompanyProfile::search(request.keyword())?;
                self.execute(&profile, request).await
            }
        }
    }

    async fn execute<P: Profile>(
        &self,
        profile: &P,
        request: &CrawlRequest,
    ) -> Result<RunResult, CrawlError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!(
            "Run {run_id}: crawling {} pages of {}",
            request.pages,
            request.profile
        );

        let output = self.collect(profile, request.pages).await;
        let summary = self.sink.persist(profile.kind(), &output.records).await?;

        let result = RunResult {
            run_id,
            profile: request.profile,
            keyword: request.keyword.clone(),
            pages_requested: request.pages,
            failed_pages: output.failed_pages,
            records_found: output.records.len(),
            records_persisted: summary.written,
            persist_failures: summary.failed,
            started_at,
            finished_at: Utc::now(),
        };
        tracing::info!(
            "Run {run_id} completed: {} found, {} persisted, {} pages failed",
            result.records_found,
            result.records_persisted,
            result.failed_pages.len()
        );
        Ok(result)
    }
}
