use serde::{Deserialize, Serialize};

/// One user's enrollment into one division of one competition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Athlete {
    pub id: String,
    pub user_id: String,
    pub competition_id: String,
    pub division_index: u32,
    /// Snapshot of the user's full name at enrollment time
    pub name: String,
    pub box_name: String,
}
