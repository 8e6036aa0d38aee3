mod athlete;
mod competition;
mod division;
mod product;
mod user;

pub use athlete::Athlete;
pub use competition::{
    Competition, CompetitionCategory, CompetitionStatus, EnrollmentType, Visibility,
};
pub use division::Division;
pub use product::{Product, ProductCategory, StockStatus};
pub use user::User;

use serde::de::DeserializeOwned;

/// Parse a stored label ("Live Competition", "pending", ...) into its enum.
///
/// Goes through serde so the accepted spellings are exactly the serialized
/// names and aliases.
pub fn parse_label<T: DeserializeOwned>(label: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(label.to_string())).ok()
}
