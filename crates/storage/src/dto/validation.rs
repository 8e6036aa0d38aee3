use rust_decimal::Decimal;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use validator::{ValidationError, ValidationErrors};

/// Field-keyed validation messages. An empty map means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the first message per field from a `validator` run
    pub fn from_validation(result: Result<(), ValidationErrors>) -> Self {
        let mut form_errors = Self::new();
        if let Err(errors) = result {
            for (field, field_errors) in errors.field_errors() {
                if let Some(error) = field_errors.first() {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    form_errors.insert(field.to_string(), message);
                }
            }
        }
        form_errors
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&joined.join("; "))
    }
}

// Validation helpers shared by the form DTOs

pub(crate) fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub(crate) fn require(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("required", message))
    } else {
        Ok(())
    }
}

pub(crate) fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// Money amounts, parsed exactly as they will be stored. Scientific notation
/// is accepted; values `Decimal` cannot hold are not.
pub(crate) fn parse_decimal(value: &str) -> Option<Decimal> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

pub(crate) fn is_non_negative_decimal(value: &str) -> bool {
    parse_decimal(value).is_some_and(|amount| amount >= Decimal::ZERO)
}

pub(crate) fn is_integer_at_least(value: &str, minimum: f64) -> bool {
    parse_number(value).is_some_and(|number| number.fract() == 0.0 && number >= minimum)
}

/// Both dates are `YYYY-MM-DD`, so string order is calendar order
pub(crate) fn dates_out_of_order(start: &str, end: &str) -> bool {
    let (start, end) = (start.trim(), end.trim());
    !start.is_empty() && !end.is_empty() && end < start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_helpers() {
        assert!(is_non_negative_decimal("0"));
        assert!(is_non_negative_decimal(" 19.99 "));
        assert!(is_non_negative_decimal("1e3"));
        assert!(!is_non_negative_decimal("-1"));
        assert!(!is_non_negative_decimal(""));
        assert!(!is_non_negative_decimal("NaN"));
        assert!(!is_non_negative_decimal("inf"));
        assert!(!is_non_negative_decimal("1e29"));
        assert_eq!(parse_decimal("1e3"), Some(Decimal::from(1000)));

        assert!(is_integer_at_least("2", 1.0));
        assert!(is_integer_at_least("2.0", 1.0));
        assert!(!is_integer_at_least("1.5", 1.0));
        assert!(!is_integer_at_least("0", 1.0));
    }

    #[test]
    fn test_dates_out_of_order() {
        assert!(dates_out_of_order("2026-05-10", "2026-05-01"));
        assert!(!dates_out_of_order("2026-05-01", "2026-05-01"));
        assert!(!dates_out_of_order("", "2026-05-01"));
        assert!(!dates_out_of_order("2026-05-10", ""));
    }

    #[test]
    fn test_form_errors_display() {
        let mut errors = FormErrors::new();
        errors.insert("sku", "SKU is required.");
        errors.insert("name", "Competition name is required.");
        assert_eq!(
            errors.to_string(),
            "name: Competition name is required.; sku: SKU is required."
        );
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("sku"), Some("SKU is required."));
    }
}
