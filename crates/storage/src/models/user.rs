use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub registered_date: NaiveDate,
}

impl User {
    /// Display name used for athlete snapshots, e.g. "Ada Lovelace"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Case-insensitive match on full name or email; an empty query matches everyone
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        let full_name = format!("{} {}", self.first_name, self.last_name).to_lowercase();
        full_name.contains(&query) || self.email.to_lowercase().contains(&query)
    }
}
