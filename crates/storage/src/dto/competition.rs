use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashSet;
use validator::{Validate, ValidationError};

use super::validation::{
    FormErrors, dates_out_of_order, error, is_integer_at_least, is_non_negative_decimal,
    parse_decimal, require,
};
use crate::models::{
    Competition, CompetitionCategory, CompetitionStatus, Division, EnrollmentType, Visibility,
};

/// Competition form as entered by the user. Numeric and date fields are kept
/// as raw text until the form validates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CompetitionForm {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[validate(custom(function = "validate_sku"))]
    pub sku: String,

    pub category: CompetitionCategory,

    #[validate(custom(function = "validate_price"))]
    pub price: String,

    #[validate(custom(function = "validate_vat"))]
    pub vat: String,

    pub enrollment_type: EnrollmentType,

    #[validate(custom(function = "validate_organizer"))]
    pub organizer: String,

    #[validate(custom(function = "validate_sport"))]
    pub sport: String,

    #[validate(custom(function = "validate_team_size"))]
    pub team_size: String,

    pub status: CompetitionStatus,
    pub enrollment_open: bool,
    pub enrollment_period_start: String,
    pub enrollment_period_end: String,
    pub visibility: Visibility,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    pub divisions: Vec<DivisionInput>,
}

impl Default for CompetitionForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            sku: String::new(),
            category: CompetitionCategory::Online,
            price: String::new(),
            vat: String::new(),
            enrollment_type: EnrollmentType::Paid,
            organizer: String::new(),
            sport: String::new(),
            team_size: "1".to_string(),
            status: CompetitionStatus::Pending,
            enrollment_open: false,
            enrollment_period_start: String::new(),
            enrollment_period_end: String::new(),
            visibility: Visibility::Public,
            start_date: String::new(),
            end_date: String::new(),
            description: String::new(),
            divisions: vec![DivisionInput::from(&Division::new(1))],
        }
    }
}

pub const DIVISIONS_MESSAGE: &str = "Each division must have a name, valid integers, \
    and enrolled athletes cannot exceed maximum athletes.";

impl CompetitionForm {
    /// Runs every field rule plus the cross-field checks (date ordering,
    /// divisions). Never mutates the form.
    pub fn validate_form(&self) -> FormErrors {
        let mut errors = FormErrors::from_validation(self.validate());

        if dates_out_of_order(&self.start_date, &self.end_date) {
            errors.insert("end_date", "End date must be after start date.");
        }

        if dates_out_of_order(&self.enrollment_period_start, &self.enrollment_period_end) {
            errors.insert(
                "enrollment_period_end",
                "Enrollment end must be after enrollment start.",
            );
        }

        let all_valid = self
            .divisions
            .iter()
            .fold(true, |valid, division| division.is_valid() && valid);
        let mut seen = HashSet::new();
        let indices_unique = self.divisions.iter().all(|division| seen.insert(division.index));

        if !all_valid || !indices_unique {
            errors.insert("divisions", DIVISIONS_MESSAGE);
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate_form().is_empty()
    }

    pub(crate) fn price_value(&self) -> Decimal {
        parse_decimal(&self.price).unwrap_or(Decimal::ZERO)
    }

    pub(crate) fn vat_value(&self) -> Option<Decimal> {
        parse_decimal(&self.vat)
    }

    pub(crate) fn team_size_value(&self) -> u32 {
        self.team_size
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|size| size.is_finite() && *size >= 1.0)
            .map(|size| size.trunc().min(f64::from(u32::MAX)) as u32)
            .unwrap_or(1)
    }
}

/// Division row of a form. Signed so that invalid input can be represented
/// and rejected by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionInput {
    pub name: String,
    pub enrollment_open: bool,
    pub max_athletes: i64,
    pub enrolled_athletes: i64,
    pub fee: i64,
    pub team_size: i64,
    pub index: i64,
}

impl DivisionInput {
    pub fn is_valid(&self) -> bool {
        let has_name = !self.name.trim().is_empty();
        let valid_max_athletes = self.max_athletes >= 0;
        let valid_enrolled_athletes = self.enrolled_athletes >= 0;
        let valid_fee = self.fee >= 0;
        let valid_team_size = self.team_size >= 1;
        let valid_index = self.index >= 1;
        let within_capacity = self.enrolled_athletes <= self.max_athletes;

        has_name
            && valid_max_athletes
            && valid_enrolled_athletes
            && valid_fee
            && valid_team_size
            && valid_index
            && within_capacity
    }

    /// Raw record in storage shape, ready for normalization
    pub fn to_raw(&self) -> Value {
        json!({
            "name": self.name,
            "enrollmentOpen": self.enrollment_open,
            "maxAthletes": self.max_athletes,
            "enrolledAthletes": self.enrolled_athletes,
            "fee": self.fee,
            "teamSize": self.team_size,
            "index": self.index,
        })
    }
}

impl From<&Division> for DivisionInput {
    fn from(division: &Division) -> Self {
        Self {
            name: division.name.clone(),
            enrollment_open: division.enrollment_open,
            max_athletes: i64::from(division.max_athletes),
            enrolled_athletes: i64::from(division.enrolled_athletes),
            fee: i64::from(division.fee),
            team_size: i64::from(division.team_size),
            index: i64::from(division.index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionStats {
    pub total_competitions: usize,
    pub total_entry_fees: Decimal,
    pub online_competitions: usize,
    pub live_competitions: usize,
}

impl CompetitionStats {
    pub fn from_competitions(competitions: &[Competition]) -> Self {
        Self {
            total_competitions: competitions.len(),
            total_entry_fees: competitions.iter().map(|c| c.price).sum(),
            online_competitions: competitions
                .iter()
                .filter(|c| c.category == CompetitionCategory::Online)
                .count(),
            live_competitions: competitions
                .iter()
                .filter(|c| c.category == CompetitionCategory::Live)
                .count(),
        }
    }
}

/// Table filter: case-insensitive search over name and SKU plus an optional category
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompetitionFilter {
    pub search: Option<String>,
    pub category: Option<CompetitionCategory>,
}

impl CompetitionFilter {
    pub fn matches(&self, competition: &Competition) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(search) if !search.is_empty() => {
                let search = search.to_lowercase();
                competition.name.to_lowercase().contains(&search)
                    || competition.sku.to_lowercase().contains(&search)
            }
            _ => true,
        };
        let matches_category = self
            .category
            .is_none_or(|category| competition.category == category);

        matches_search && matches_category
    }
}

// Validation helpers
fn validate_name(name: &str) -> Result<(), ValidationError> {
    require(name, "Competition name is required.")
}

fn validate_sku(sku: &str) -> Result<(), ValidationError> {
    require(sku, "SKU is required.")
}

fn validate_organizer(organizer: &str) -> Result<(), ValidationError> {
    require(organizer, "Organizer is required.")
}

fn validate_sport(sport: &str) -> Result<(), ValidationError> {
    require(sport, "Sport is required.")
}

fn validate_price(price: &str) -> Result<(), ValidationError> {
    if is_non_negative_decimal(price) {
        Ok(())
    } else {
        Err(error("invalid_price", "Enter a valid entry fee."))
    }
}

fn validate_vat(vat: &str) -> Result<(), ValidationError> {
    if vat.trim().is_empty() || is_non_negative_decimal(vat) {
        Ok(())
    } else {
        Err(error("invalid_vat", "Enter a valid VAT percentage."))
    }
}

fn validate_team_size(team_size: &str) -> Result<(), ValidationError> {
    if is_integer_at_least(team_size, 1.0) {
        Ok(())
    } else {
        Err(error(
            "invalid_team_size",
            "Team size must be an integer of at least 1.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> CompetitionForm {
        CompetitionForm {
            name: "5K Run".to_string(),
            sku: "run-01".to_string(),
            price: "20".to_string(),
            organizer: "City Runners".to_string(),
            sport: "Running".to_string(),
            team_size: "1".to_string(),
            ..CompetitionForm::default()
        }
    }

    fn division(max: i64, enrolled: i64) -> DivisionInput {
        DivisionInput {
            name: "Open".to_string(),
            enrollment_open: true,
            max_athletes: max,
            enrolled_athletes: enrolled,
            fee: 0,
            team_size: 1,
            index: 1,
        }
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        assert!(valid_form().validate_form().is_empty());
    }

    #[test]
    fn test_empty_form_requires_fields() {
        let errors = CompetitionForm::default().validate_form();
        assert_eq!(errors.get("name"), Some("Competition name is required."));
        assert_eq!(errors.get("sku"), Some("SKU is required."));
        assert_eq!(errors.get("organizer"), Some("Organizer is required."));
        assert_eq!(errors.get("sport"), Some("Sport is required."));
        assert_eq!(errors.get("price"), Some("Enter a valid entry fee."));
        assert!(!errors.contains("team_size"));
        assert!(!errors.contains("vat"));
    }

    #[test]
    fn test_blank_text_counts_as_missing() {
        let form = CompetitionForm {
            name: "   ".to_string(),
            ..valid_form()
        };
        let errors = form.validate_form();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("name"));
    }

    #[test]
    fn test_end_date_before_start_date() {
        let form = CompetitionForm {
            start_date: "2026-05-10".to_string(),
            end_date: "2026-05-01".to_string(),
            ..valid_form()
        };
        let errors = form.validate_form();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("end_date"), Some("End date must be after start date."));
    }

    #[test]
    fn test_enrollment_period_order() {
        let form = CompetitionForm {
            enrollment_period_start: "2026-04-01".to_string(),
            enrollment_period_end: "2026-03-01".to_string(),
            ..valid_form()
        };
        let errors = form.validate_form();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["enrollment_period_end"]
        );
    }

    #[test]
    fn test_numeric_fields() {
        let form = CompetitionForm {
            price: "-5".to_string(),
            vat: "abc".to_string(),
            team_size: "1.5".to_string(),
            ..valid_form()
        };
        let errors = form.validate_form();
        assert!(errors.contains("price"));
        assert!(errors.contains("vat"));
        assert!(errors.contains("team_size"));
    }

    #[test]
    fn test_prices_beyond_decimal_range_are_rejected() {
        let form = CompetitionForm {
            price: "1e29".to_string(),
            vat: "1e29".to_string(),
            ..valid_form()
        };
        let errors = form.validate_form();
        assert_eq!(errors.get("price"), Some("Enter a valid entry fee."));
        assert_eq!(errors.get("vat"), Some("Enter a valid VAT percentage."));

        let scientific = CompetitionForm {
            price: "2.5e1".to_string(),
            ..valid_form()
        };
        assert!(scientific.is_valid());
        assert_eq!(scientific.price_value(), Decimal::from(25));
    }

    #[test]
    fn test_division_over_capacity_yields_aggregate_error() {
        let form = CompetitionForm {
            divisions: vec![division(5, 2), division(5, 9)],
            ..valid_form()
        };
        let errors = form.validate_form();
        assert_eq!(errors.get("divisions"), Some(DIVISIONS_MESSAGE));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_duplicate_division_indices_rejected() {
        let form = CompetitionForm {
            divisions: vec![division(5, 0), division(5, 0)],
            ..valid_form()
        };
        assert!(form.validate_form().contains("divisions"));
    }

    #[test]
    fn test_division_predicate() {
        assert!(division(3, 3).is_valid());
        assert!(!division(3, 4).is_valid());
        assert!(!DivisionInput { index: 0, ..division(3, 0) }.is_valid());
        assert!(!DivisionInput { team_size: 0, ..division(3, 0) }.is_valid());
        assert!(!DivisionInput { fee: -1, ..division(3, 0) }.is_valid());
        assert!(!DivisionInput { name: " ".to_string(), ..division(3, 0) }.is_valid());
    }

    #[test]
    fn test_parsed_values() {
        let form = CompetitionForm {
            price: "19.99".to_string(),
            vat: "".to_string(),
            team_size: "4".to_string(),
            ..valid_form()
        };
        assert_eq!(form.price_value(), Decimal::new(1999, 2));
        assert_eq!(form.vat_value(), None);
        assert_eq!(form.team_size_value(), 4);
    }

    #[test]
    fn test_form_deserializes_with_defaults() {
        let form: CompetitionForm =
            serde_json::from_value(json!({ "name": "Meet", "teamSize": "2" })).unwrap();
        assert_eq!(form.name, "Meet");
        assert_eq!(form.team_size, "2");
        assert_eq!(form.divisions.len(), 1);
        assert_eq!(form.status, CompetitionStatus::Pending);
    }
}
