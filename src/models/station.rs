use serde::Serialize;

use super::{Record, present};

/// A posting found through the subway-station listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRecord {
    #[serde(rename = "회사명")]
    pub company: String,
    #[serde(rename = "제목")]
    pub title: String,
    #[serde(rename = "공고링크")]
    pub detail_link: String,
    #[serde(rename = "지역")]
    pub location: String,
    #[serde(rename = "마감일")]
    pub deadline: String,
    #[serde(rename = "가까운역")]
    pub nearest_station: String,
}

impl Record for StationRecord {
    fn is_complete(&self) -> bool {
        present(&self.company) && present(&self.title) && present(&self.nearest_station)
    }

    fn row(&self) -> Vec<(&'static str, String)> {
        vec![
            ("company_name", self.company.clone()),
            ("job_title", self.title.clone()),
            ("job_link", self.detail_link.clone()),
            ("location", self.location.clone()),
            ("deadline", self.deadline.clone()),
            ("nearest_station", self.nearest_station.clone()),
        ]
    }
}
