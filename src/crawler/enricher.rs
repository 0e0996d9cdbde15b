use scraper::{Html, Selector};

use crate::crawler::extract::{selector, value_after_label};
use crate::crawler::fetcher::Fetch;
use crate::error::CrawlError;
use crate::models::listing::Salary;

const SUMMARY_CONTAINER: &str = ".jv_cont.jv_summary .cont .col";
const SALARY_LABEL: &str = "급여";

/// Reads the salary from a posting's detail page.
pub struct DetailEnricher {
    summary: Selector,
    label: Selector,
}

impl DetailEnricher {
    pub fn new() -> Result<Self, CrawlError> {
        Ok(Self {
            summary: selector(SUMMARY_CONTAINER)?,
            label: selector("dt")?,
        })
    }

    /// Fetch `link` and read its salary. A failed fetch degrades to
    /// `Salary::Unavailable` rather than dropping the record.
    pub async fn salary(&self, fetcher: &dyn Fetch, link: &str) -> Salary {
        match fetcher.get(link).await {
            Ok(html) => self.salary_from_html(&html),
            Err(e) => {
                tracing::warn!("Detail page unavailable: {e}");
                Salary::Unavailable
            }
        }
    }

    pub fn salary_from_html(&self, html: &str) -> Salary {
        let document = Html::parse_document(html);
        document
            .select(&self.summary)
            .find_map(|col| value_after_label(col, &self.label, SALARY_LABEL))
            .map(Salary::from_text)
            .unwrap_or(Salary::Unspecified)
    }
}
