use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::{Record, present};

/// Salary as reported on a listing or its detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Salary {
    Value(String),
    /// The page was read but carried no salary value.
    Unspecified,
    /// The detail page could not be fetched.
    Unavailable,
}

impl Salary {
    pub const UNSPECIFIED_LABEL: &'static str = "회사내규에 따름";
    pub const UNAVAILABLE_LABEL: &'static str = "정보 없음";

    /// Wrap scraped text, treating blank text as `Unspecified`.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Salary::Unspecified
        } else {
            Salary::Value(trimmed.to_string())
        }
    }
}

impl fmt::Display for Salary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Salary::Value(v) => f.write_str(v),
            Salary::Unspecified => f.write_str(Self::UNSPECIFIED_LABEL),
            Salary::Unavailable => f.write_str(Self::UNAVAILABLE_LABEL),
        }
    }
}

impl Serialize for Salary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A job posting from a recruit search, intern or newcomer listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub company: String,
    pub title: String,
    pub detail_link: String,
    pub location: String,
    pub experience: String,
    pub education: String,
    pub employment_type: String,
    pub deadline: String,
    /// `None` when the listing type has no sector field at all.
    pub sector: Option<String>,
    pub salary: Salary,
}

/// Recruit search exports carry a sector column after the deadline; public
/// list exports (intern, newcomer) have none and put the deadline first.
impl Serialize for ListingRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.sector.is_some() { 10 } else { 9 };
        let mut s = serializer.serialize_struct("ListingRecord", len)?;
        s.serialize_field("회사명", &self.company)?;
        s.serialize_field("제목", &self.title)?;
        s.serialize_field("공고링크", &self.detail_link)?;
        s.serialize_field("지역", &self.location)?;
        s.serialize_field("경력", &self.experience)?;
        s.serialize_field("학력", &self.education)?;
        match &self.sector {
            Some(sector) => {
                s.serialize_field("고용형태", &self.employment_type)?;
                s.serialize_field("마감일", &self.deadline)?;
                s.serialize_field("직무분야", sector)?;
            }
            None => {
                s.serialize_field("마감일", &self.deadline)?;
                s.serialize_field("고용형태", &self.employment_type)?;
            }
        }
        s.serialize_field("연봉정보", &self.salary)?;
        s.end()
    }
}

impl Record for ListingRecord {
    fn is_complete(&self) -> bool {
        present(&self.company) && present(&self.title)
    }

    fn row(&self) -> Vec<(&'static str, String)> {
        let mut row = vec![
            ("company_name", self.company.clone()),
            ("title", self.title.clone()),
            ("link", self.detail_link.clone()),
            ("location", self.location.clone()),
            ("experience", self.experience.clone()),
            ("education", self.education.clone()),
            ("employment_type", self.employment_type.clone()),
            ("deadline", self.deadline.clone()),
        ];
        if let Some(sector) = &self.sector {
            row.push(("sector", sector.clone()));
        }
        row.push(("salary", self.salary.to_string()));
        row
    }
}
