// Crawler module: listing-type profiles and the fetch/extract/enrich pipeline
// that drives them.

pub mod enricher;
pub mod extract;
pub mod fetcher;
pub mod pager;
pub mod runner;
pub mod saramin;

use std::fmt;

use async_trait::async_trait;
use scraper::{ElementRef, Selector};
use serde::Serialize;

use crate::crawler::enricher::DetailEnricher;
use crate::crawler::fetcher::Fetch;
use crate::error::ExtractionError;
use crate::models::Record;

/// The listing types the crawler knows how to walk.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    /// Keyword search over all recruit postings.
    Recruit,
    /// Public intern listing.
    Intern,
    /// Public new-graduate listing.
    Newcomer,
    /// Postings grouped by nearest subway station.
    Station,
    /// Keyword search over company profiles.
    Company,
}

impl ListingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingKind::Recruit => "recruit",
            ListingKind::Intern => "intern",
            ListingKind::Newcomer => "newcomer",
            ListingKind::Station => "station",
            ListingKind::Company => "company",
        }
    }

    /// Parse a query-string value, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        <Self as clap::ValueEnum>::from_str(value.trim(), true).ok()
    }

    pub fn default_pages(self) -> u32 {
        match self {
            ListingKind::Recruit => 5,
            _ => 10,
        }
    }

    /// Keyword used when a keyword-driven listing is requested without one.
    pub fn default_keyword(self) -> Option<&'static str> {
        match self {
            ListingKind::Recruit => Some("javascript"),
            ListingKind::Company => Some("개발"),
            _ => None,
        }
    }

    /// Table in the job-board database that receives this listing's rows.
    pub fn table(self) -> &'static str {
        match self {
            ListingKind::Recruit => "jobs",
            ListingKind::Intern => "interns",
            ListingKind::Newcomer => "newjobs",
            ListingKind::Station => "stations",
            ListingKind::Company => "companies",
        }
    }

    pub fn csv_file(self) -> &'static str {
        match self {
            ListingKind::Recruit => "saramin_jobs.csv",
            ListingKind::Intern => "saramin_interns.csv",
            ListingKind::Newcomer => "saramin_newjobs.csv",
            ListingKind::Station => "saramin_stations.csv",
            ListingKind::Company => "saramin_companies.csv",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the pipeline needs to know about one listing type:
/// where its pages live, what a listing container looks like, and how
/// fields are read out of a container.
#[async_trait]
pub trait Profile: Send + Sync {
    type Record: Record;

    fn kind(&self) -> ListingKind;

    /// Absolute URL of listing page `page` (1-based).
    fn page_url(&self, page: u32) -> String;

    /// Selector matching one listing container.
    fn container(&self) -> &Selector;

    /// Read a partial record out of one container.
    fn extract(&self, container: ElementRef<'_>) -> Result<Self::Record, ExtractionError>;

    /// Complete a record with data that only its detail page carries.
    async fn enrich(
        &self,
        record: Self::Record,
        _enricher: &DetailEnricher,
        _fetcher: &dyn Fetch,
    ) -> Self::Record {
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(ListingKind::parse("Intern"), Some(ListingKind::Intern));
        assert_eq!(ListingKind::parse(" station "), Some(ListingKind::Station));
        assert_eq!(ListingKind::parse("bookmarks"), None);
    }

    #[test]
    fn keyword_defaults_only_for_search_listings() {
        assert_eq!(ListingKind::Recruit.default_keyword(), Some("javascript"));
        assert_eq!(ListingKind::Company.default_keyword(), Some("개발"));
        assert_eq!(ListingKind::Intern.default_keyword(), None);
        assert_eq!(ListingKind::Recruit.default_pages(), 5);
        assert_eq!(ListingKind::Station.default_pages(), 10);
    }
}
