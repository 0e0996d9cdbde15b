use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use scraper::{ElementRef, Selector};

use crate::crawler::enricher::DetailEnricher;
use crate::crawler::extract::{FieldRule, selector};
use crate::crawler::fetcher::Fetch;
use crate::crawler::{ListingKind, Profile};
use crate::error::{CrawlError, ExtractionError};
use crate::models::company::CompanyRecord;
use crate::models::listing::{ListingRecord, Salary};
use crate::models::station::StationRecord;

pub const BASE_URL: &str = "https://www.saramin.co.kr";

/// Characters that encodeURIComponent does NOT encode.
/// RFC 3986 unreserved: A-Z a-z 0-9 - _ . ! ~ * ' ( )
const ENCODE_URI_COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn urlencoded(s: &str) -> String {
    utf8_percent_encode(s, ENCODE_URI_COMPONENT_SET).to_string()
}

/// Turn a scraped href into an absolute link on the site.
fn absolute_link(href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{BASE_URL}{href}")
    }
}

pub enum SalarySource {
    /// Read from the posting's detail page after extraction.
    DetailPage,
    /// Read from the listing container itself.
    Listing(FieldRule),
}

/// Job-type listings: recruit search, intern and newcomer lists.
pub struct JobProfile {
    kind: ListingKind,
    keyword: Option<String>,
    container: Selector,
    company: FieldRule,
    title: FieldRule,
    link: FieldRule,
    location: FieldRule,
    experience: FieldRule,
    education: FieldRule,
    employment_type: FieldRule,
    deadline: FieldRule,
    sector: Option<FieldRule>,
    salary: SalarySource,
}

impl JobProfile {
    /// Keyword search over recruit postings. The four condition fields are
    /// positional within `.job_condition`, which has no per-field classes.
    pub fn recruit(keyword: &str) -> Result<Self, CrawlError> {
        const CONDITIONS: &str = ".job_condition span";
        Ok(Self {
            kind: ListingKind::Recruit,
            keyword: Some(urlencoded(keyword)),
            container: selector(".item_recruit")?,
            company: FieldRule::text(".corp_name a")?,
            title: FieldRule::text(".job_tit a")?,
            link: FieldRule::attr(".job_tit a", "href")?,
            location: FieldRule::nth(CONDITIONS, 0)?,
            experience: FieldRule::nth(CONDITIONS, 1)?,
            education: FieldRule::nth(CONDITIONS, 2)?,
            employment_type: FieldRule::nth(CONDITIONS, 3)?,
            deadline: FieldRule::text(".job_date .date")?,
            sector: Some(FieldRule::text(".job_sector")?),
            salary: SalarySource::DetailPage,
        })
    }

    pub fn intern() -> Result<Self, CrawlError> {
        Self::public_list(ListingKind::Intern, "인턴")
    }

    pub fn newcomer() -> Result<Self, CrawlError> {
        Self::public_list(ListingKind::Newcomer, "신입")
    }

    fn public_list(kind: ListingKind, employment_type: &'static str) -> Result<Self, CrawlError> {
        Ok(Self {
            kind,
            keyword: None,
            container: selector(".box_item")?,
            company: FieldRule::text(".company_nm a")?,
            title: FieldRule::attr(".notification_info a", "title")?,
            link: FieldRule::attr(".notification_info a", "href")?,
            location: FieldRule::text(".work_place")?,
            experience: FieldRule::text(".career")?,
            education: FieldRule::text(".education")?,
            employment_type: FieldRule::Fixed(employment_type),
            deadline: FieldRule::text(".date")?,
            sector: None,
            salary: SalarySource::Listing(FieldRule::text(".salary")?),
        })
    }
}

#[async_trait]
impl Profile for JobProfile {
    type Record = ListingRecord;

    fn kind(&self) -> ListingKind {
        self.kind
    }

    fn page_url(&self, page: u32) -> String {
        match self.kind {
            ListingKind::Recruit => format!(
                "{BASE_URL}/zf_user/search/recruit?searchType=search&searchword={}&recruitPage={page}",
                self.keyword.as_deref().unwrap_or_default()
            ),
            ListingKind::Newcomer => {
                format!("{BASE_URL}/zf_user/jobs/public/list?page={page}&type=newcomer")
            }
            _ => format!("{BASE_URL}/zf_user/jobs/public/list?page={page}&type=intern"),
        }
    }

    fn container(&self) -> &Selector {
        &self.container
    }

    fn extract(&self, container: ElementRef<'_>) -> Result<ListingRecord, ExtractionError> {
        let href = self.link.require(container)?;
        let salary = match &self.salary {
            SalarySource::DetailPage => Salary::Unspecified,
            SalarySource::Listing(rule) => Salary::from_text(rule.apply(container)),
        };

        Ok(ListingRecord {
            company: self.company.apply(container),
            title: self.title.apply(container),
            detail_link: absolute_link(&href),
            location: self.location.apply(container),
            experience: self.experience.apply(container),
            education: self.education.apply(container),
            employment_type: self.employment_type.apply(container),
            deadline: self.deadline.apply(container),
            sector: self.sector.as_ref().map(|rule| rule.apply(container)),
            salary,
        })
    }

    async fn enrich(
        &self,
        mut record: ListingRecord,
        enricher: &DetailEnricher,
        fetcher: &dyn Fetch,
    ) -> ListingRecord {
        if let SalarySource::DetailPage = self.salary {
            record.salary = enricher.salary(fetcher, &record.detail_link).await;
        }
        record
    }
}

/// Postings grouped by nearest subway station.
pub struct StationProfile {
    container: Selector,
    company: FieldRule,
    title: FieldRule,
    link: FieldRule,
    location: FieldRule,
    deadline: FieldRule,
    nearest_station: FieldRule,
}

impl StationProfile {
    pub fn new() -> Result<Self, CrawlError> {
        Ok(Self {
            container: selector(".box_item")?,
            company: FieldRule::text(".company_nm a")?,
            title: FieldRule::attr(".notification_info a", "title")?,
            link: FieldRule::attr(".notification_info a", "href")?,
            location: FieldRule::text(".work_place")?,
            deadline: FieldRule::text(".date")?,
            nearest_station: FieldRule::text(".distance")?,
        })
    }
}

#[async_trait]
impl Profile for StationProfile {
    type Record = StationRecord;

    fn kind(&self) -> ListingKind {
        ListingKind::Station
    }

    fn page_url(&self, page: u32) -> String {
        format!("{BASE_URL}/zf_user/jobs/list/subway?page={page}")
    }

    fn container(&self) -> &Selector {
        &self.container
    }

    fn extract(&self, container: ElementRef<'_>) -> Result<StationRecord, ExtractionError> {
        let href = self.link.require(container)?;
        Ok(StationRecord {
            company: self.company.apply(container),
            title: self.title.apply(container),
            detail_link: absolute_link(&href),
            location: self.location.apply(container),
            deadline: self.deadline.apply(container),
            nearest_station: self.nearest_station.apply(container),
        })
    }
}

/// Company search results. Each `.corp_info dl` holds one labelled fact,
/// always in the same order.
pub struct CompanyProfile {
    keyword: String,
    container: Selector,
    company: FieldRule,
    established: FieldRule,
    representative: FieldRule,
    industry: FieldRule,
    financial: FieldRule,
    address: FieldRule,
}

impl CompanyProfile {
    pub fn search(keyword: &str) -> Result<Self, CrawlError> {
        const FACTS: &str = ".corp_info dl";
        Ok(Self {
            keyword: urlencoded(keyword),
            container: selector(".item_corp")?,
            company: FieldRule::text(".corp_name a")?,
            established: FieldRule::nth_within(FACTS, 0, "dd")?,
            representative: FieldRule::nth_within(FACTS, 1, "dd")?,
            industry: FieldRule::nth_within(FACTS, 2, "dd")?,
            financial: FieldRule::nth_within(FACTS, 3, "dd")?,
            address: FieldRule::nth_within(FACTS, 4, "dd")?,
        })
    }
}

#[async_trait]
impl Profile for CompanyProfile {
    type Record = CompanyRecord;

    fn kind(&self) -> ListingKind {
        ListingKind::Company
    }

    fn page_url(&self, page: u32) -> String {
        format!(
            "{BASE_URL}/zf_user/search/company?searchword={}&page={page}",
            self.keyword
        )
    }

    fn container(&self) -> &Selector {
        &self.container
    }

    fn extract(&self, container: ElementRef<'_>) -> Result<CompanyRecord, ExtractionError> {
        Ok(CompanyRecord {
            company: self.company.apply(container),
            established: self.established.apply(container),
            representative: self.representative.apply(container),
            industry: self.industry.apply(container),
            financial: self.financial.apply(container),
            address: self.address.apply(container),
        })
    }
}
