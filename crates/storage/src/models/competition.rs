use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Division;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompetitionCategory {
    #[default]
    #[serde(rename = "Online Competition", alias = "Online")]
    Online,
    #[serde(rename = "Live Competition", alias = "Live")]
    Live,
}

impl CompetitionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "Online Competition",
            Self::Live => "Live Competition",
        }
    }
}

impl fmt::Display for CompetitionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentType {
    #[default]
    Paid,
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionStatus {
    #[default]
    Pending,
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// An enrollable event. Owns its divisions, which are kept sorted by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: CompetitionCategory,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub vat: Option<Decimal>,
    pub enrollment_type: EnrollmentType,
    pub organizer: String,
    pub sport: String,
    pub team_size: u32,
    pub status: CompetitionStatus,
    pub enrollment_open: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_period_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_period_end: Option<NaiveDate>,
    pub visibility: Visibility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub divisions: Vec<Division>,
}

impl Competition {
    pub fn division(&self, index: u32) -> Option<&Division> {
        self.divisions.iter().find(|division| division.index == index)
    }

    pub fn division_mut(&mut self, index: u32) -> Option<&mut Division> {
        self.divisions.iter_mut().find(|division| division.index == index)
    }
}
