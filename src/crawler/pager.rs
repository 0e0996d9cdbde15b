use std::time::Duration;

use futures::StreamExt;
use rand::Rng;

use crate::crawler::Profile;
use crate::crawler::enricher::DetailEnricher;
use crate::crawler::extract::extract_page;
use crate::crawler::fetcher::Fetch;

/// Default cap on simultaneous detail-page fetches within one listing page.
pub const DETAIL_FETCH_CONCURRENCY: usize = 5;

/// Uniform random pause taken after every listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDelay {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl PageDelay {
    pub const POLITE: PageDelay = PageDelay {
        min_ms: 1000,
        max_ms: 3000,
    };

    pub fn sample(&self) -> Duration {
        let ms = rand::rng().random_range(self.min_ms..=self.max_ms.max(self.min_ms));
        Duration::from_millis(ms)
    }
}

impl Default for PageDelay {
    fn default() -> Self {
        Self::POLITE
    }
}

#[derive(Debug)]
pub struct PagerOutput<R> {
    pub records: Vec<R>,
    /// Pages whose fetch failed and contributed no records.
    pub failed_pages: Vec<u32>,
}

pub struct Pager {
    delay: PageDelay,
    concurrency: usize,
}

impl Pager {
    pub fn new(delay: PageDelay, concurrency: usize) -> Self {
        Self {
            delay,
            concurrency: concurrency.max(1),
        }
    }

    /// Walk pages `1..=pages` in order. A failed page is logged and
    /// counted as empty; the walk always continues to the next page.
    pub async fn run<P: Profile>(
        &self,
        profile: &P,
        fetcher: &dyn Fetch,
        enricher: &DetailEnricher,
        pages: u32,
    ) -> PagerOutput<P::Record> {
        let kind = profile.kind();
        let mut output = PagerOutput {
            records: Vec::new(),
            failed_pages: Vec::new(),
        };

        for page in 1..=pages {
            let url = profile.page_url(page);
            match fetcher.get(&url).await {
                Ok(html) => {
                    let listings = extract_page(profile, &html);
                    let found = listings.len();

                    // buffered() keeps DOM order while capping in-flight fetches.
                    let enriched: Vec<_> = futures::stream::iter(listings)
                        .map(|record| profile.enrich(record, enricher, fetcher))
                        .buffered(self.concurrency)
                        .collect()
                        .await;
                    output.records.extend(enriched);

                    tracing::info!("Page {page} of {kind} crawled: {found} listings");
                }
                Err(e) => {
                    tracing::error!("Page {page} of {kind} failed: {e}");
                    output.failed_pages.push(page);
                }
            }

            tokio::time::sleep(self.delay.sample()).await;
        }

        output
    }
}
