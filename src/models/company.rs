use serde::Serialize;

use super::{Record, present};

/// A company profile from the company search listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyRecord {
    #[serde(rename = "회사명")]
    pub company: String,
    #[serde(rename = "설립일")]
    pub established: String,
    #[serde(rename = "대표자명")]
    pub representative: String,
    #[serde(rename = "업종")]
    pub industry: String,
    #[serde(rename = "재무정보")]
    pub financial: String,
    #[serde(rename = "기업주소")]
    pub address: String,
}

impl Record for CompanyRecord {
    fn is_complete(&self) -> bool {
        present(&self.company) && present(&self.representative)
    }

    fn row(&self) -> Vec<(&'static str, String)> {
        vec![
            ("company_name", self.company.clone()),
            ("establishment", self.established.clone()),
            ("representative", self.representative.clone()),
            ("industry", self.industry.clone()),
            ("financial", self.financial.clone()),
            ("location", self.address.clone()),
        ]
    }
}
