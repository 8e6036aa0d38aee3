use serde::{Deserialize, Serialize};

/// A capacity-bounded enrollment bucket inside a competition.
///
/// `enrolled_athletes` never exceeds `max_athletes` once a division has gone
/// through normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Division {
    pub name: String,
    pub enrollment_open: bool,
    pub max_athletes: u32,
    pub enrolled_athletes: u32,
    pub fee: u32,
    pub team_size: u32,
    pub index: u32,
}

impl Division {
    /// Blank division as offered when a new row is added to a form
    pub fn new(index: u32) -> Self {
        let index = index.max(1);
        Self {
            name: format!("Division {}", index),
            enrollment_open: false,
            max_athletes: 1,
            enrolled_athletes: 0,
            fee: 0,
            team_size: 1,
            index,
        }
    }

    pub fn is_full(&self) -> bool {
        self.enrolled_athletes >= self.max_athletes
    }
}
