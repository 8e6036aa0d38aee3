//! Coercion of raw stored records into their canonical shape.
//!
//! Stored data is untrusted: fields may be missing, mistyped or out of range.
//! Every function here repairs instead of rejecting, and applying any of them
//! twice gives the same result as applying it once.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use uuid::Uuid;

use crate::models::{
    Athlete, Competition, CompetitionCategory, CompetitionStatus, Division, EnrollmentType,
    Product, ProductCategory, Visibility, parse_label,
};

/// Numeric reading of a JSON value: numbers as-is, booleans as 1/0, numeric
/// strings parsed, blank strings and null as 0. `None` means "not a number".
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Null => Some(0.0),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                Some(0.0)
            } else {
                text.parse::<f64>().ok().filter(|number| !number.is_nan())
            }
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Truncate toward zero and clamp into `floor..=u32::MAX`
fn truncate_at_least(number: f64, floor: u32) -> u32 {
    let truncated = number.trunc();
    if truncated <= f64::from(floor) {
        floor
    } else if truncated >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        truncated as u32
    }
}

/// Integer field where zero and non-numbers fall back to `fallback`
fn count_or(value: Option<&Value>, fallback: u32, floor: u32) -> u32 {
    coerce_number(value)
        .filter(|number| *number != 0.0)
        .map(|number| truncate_at_least(number, floor))
        .unwrap_or(fallback.max(floor))
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

fn optional_text(value: Option<&Value>) -> Option<String> {
    Some(text(value)).filter(|text| !text.is_empty())
}

fn date(value: Option<&Value>) -> Option<NaiveDate> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .and_then(|text| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok())
}

fn decimal_from_number(number: &Number) -> Option<Decimal> {
    let repr = number.to_string();
    repr.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&repr))
        .ok()
}

fn decimal(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(number) => decimal_from_number(number),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<Decimal>()
                .or_else(|_| Decimal::from_scientific(text))
                .ok()
        }
        _ => None,
    }
}

fn label<T: serde::de::DeserializeOwned>(value: Option<&Value>) -> Option<T> {
    value.and_then(Value::as_str).and_then(parse_label)
}

fn record_id(value: Option<&Value>, prefix: &str) -> String {
    optional_text(value).unwrap_or_else(|| format!("{}-{}", prefix, Uuid::new_v4()))
}

/// Repairs one stored division. `fallback_index` is its 1-based position.
pub fn normalize_division(raw: &Value, fallback_index: u32) -> Division {
    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Division {}", fallback_index));

    let max_athletes = count_or(raw.get("maxAthletes"), 0, 0);
    // Clamped after max_athletes is resolved so corrupt counts can never exceed capacity
    let enrolled_athletes = count_or(raw.get("enrolledAthletes"), 0, 0).min(max_athletes);

    Division {
        name,
        enrollment_open: is_truthy(raw.get("enrollmentOpen")),
        max_athletes,
        enrolled_athletes,
        fee: count_or(raw.get("fee"), 0, 0),
        team_size: count_or(raw.get("teamSize"), 1, 1),
        index: count_or(raw.get("index"), fallback_index, 1),
    }
}

/// Normalizes every entry and sorts ascending by index. Anything that is not
/// an array yields no divisions.
pub fn normalize_divisions(raw: &Value) -> Vec<Division> {
    let mut divisions: Vec<Division> = raw
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .enumerate()
                .map(|(position, entry)| normalize_division(entry, position_index(position)))
                .collect()
        })
        .unwrap_or_default();

    divisions.sort_by_key(|division| division.index);
    divisions
}

fn position_index(position: usize) -> u32 {
    u32::try_from(position.saturating_add(1)).unwrap_or(u32::MAX)
}

/// Renumbers divisions 1..N keeping their current order
pub fn reindex_divisions(divisions: Vec<Division>) -> Vec<Division> {
    divisions
        .into_iter()
        .enumerate()
        .map(|(position, division)| Division {
            index: position_index(position),
            ..division
        })
        .collect()
}

/// Drops the division at `position` (0-based) and renumbers the rest
pub fn remove_division(divisions: &[Division], position: usize) -> Vec<Division> {
    let remaining = divisions
        .iter()
        .enumerate()
        .filter(|(current, _)| *current != position)
        .map(|(_, division)| division.clone())
        .collect();
    reindex_divisions(remaining)
}

/// Appends a default division numbered after the existing ones
pub fn append_division(divisions: &[Division]) -> Vec<Division> {
    let mut next = divisions.to_vec();
    next.push(Division::new(position_index(divisions.len())));
    next
}

/// Repairs one stored competition.
///
/// Closed enums fall back to their defaults, team size must be a positive
/// integer, unparseable dates are dropped. An unknown category is coerced to
/// `Online`; use [`sanitize_competitions`] to drop such records instead.
pub fn normalize_competition(raw: &Value) -> Competition {
    let team_size = coerce_number(raw.get("teamSize"))
        .filter(|size| size.fract() == 0.0 && *size > 0.0)
        .map(|size| truncate_at_least(size, 1))
        .unwrap_or(1);

    Competition {
        id: record_id(raw.get("id"), "comp"),
        name: text(raw.get("name")),
        sku: text(raw.get("sku")),
        category: label(raw.get("category")).unwrap_or(CompetitionCategory::Online),
        price: decimal(raw.get("price"))
            .filter(|price| !price.is_sign_negative())
            .unwrap_or(Decimal::ZERO),
        vat: decimal(raw.get("vat")).filter(|vat| !vat.is_sign_negative()),
        enrollment_type: label(raw.get("enrollmentType")).unwrap_or(EnrollmentType::Paid),
        organizer: text(raw.get("organizer")).trim().to_string(),
        sport: text(raw.get("sport")).trim().to_string(),
        team_size,
        status: label(raw.get("status")).unwrap_or(CompetitionStatus::Pending),
        enrollment_open: is_truthy(raw.get("enrollmentOpen")),
        enrollment_period_start: date(raw.get("enrollmentPeriodStart")),
        enrollment_period_end: date(raw.get("enrollmentPeriodEnd")),
        visibility: label(raw.get("visibility")).unwrap_or(Visibility::Public),
        start_date: date(raw.get("startDate")),
        end_date: date(raw.get("endDate")),
        description: optional_text(raw.get("description")),
        divisions: raw
            .get("divisions")
            .map(normalize_divisions)
            .unwrap_or_default(),
    }
}

/// Drops records whose category is not a competition category and
/// normalizes the rest. Guards against stale or foreign data in storage.
pub fn sanitize_competitions(records: &Value) -> Vec<Competition> {
    records
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter(|entry| label::<CompetitionCategory>(entry.get("category")).is_some())
                .map(normalize_competition)
                .collect()
        })
        .unwrap_or_default()
}

/// Quantity-like field: absent stays absent, present is truncated and floored at 0
fn optional_count(value: Option<&Value>) -> Option<u32> {
    match value {
        None | Some(Value::Null) => None,
        other => coerce_number(other).map(|number| truncate_at_least(number, 0)),
    }
}

pub fn normalize_product(raw: &Value) -> Product {
    Product {
        id: record_id(raw.get("id"), "prod"),
        name: text(raw.get("name")),
        sku: text(raw.get("sku")),
        category: label(raw.get("category")).unwrap_or_default(),
        price: decimal(raw.get("price"))
            .filter(|price| !price.is_sign_negative())
            .unwrap_or(Decimal::ZERO),
        quantity: optional_count(raw.get("quantity")),
        low_stock_threshold: optional_count(raw.get("lowStockThreshold")),
    }
}

/// Keeps inventory categories only; competition records never leak into the
/// product table.
pub fn sanitize_products(records: &Value) -> Vec<Product> {
    records
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter(|entry| label::<ProductCategory>(entry.get("category")).is_some())
                .map(normalize_product)
                .collect()
        })
        .unwrap_or_default()
}

/// Athlete records without a user or competition reference are dropped
pub fn sanitize_athletes(records: &Value) -> Vec<Athlete> {
    records
        .as_array()
        .map(|entries| entries.iter().filter_map(normalize_athlete).collect())
        .unwrap_or_default()
}

pub fn normalize_athlete(raw: &Value) -> Option<Athlete> {
    let user_id = optional_text(raw.get("userId"))?;
    let competition_id = optional_text(raw.get("competitionId"))?;

    Some(Athlete {
        id: record_id(raw.get("id"), "ath"),
        user_id,
        competition_id,
        division_index: count_or(raw.get("divisionIndex"), 1, 1),
        name: text(raw.get("name")).trim().to_string(),
        box_name: text(raw.get("boxName")).trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn division(index: u32) -> Division {
        Division {
            name: format!("D{}", index),
            ..Division::new(index)
        }
    }

    #[test]
    fn test_division_enrolled_clamped_to_capacity() {
        let normalized = normalize_division(&json!({ "maxAthletes": 5, "enrolledAthletes": 9 }), 1);
        assert_eq!(normalized.max_athletes, 5);
        assert_eq!(normalized.enrolled_athletes, 5);
    }

    #[test]
    fn test_division_defaults_from_garbage() {
        let normalized = normalize_division(
            &json!({
                "name": "   ",
                "maxAthletes": "lots",
                "enrolledAthletes": -4,
                "fee": -10.7,
                "teamSize": 0,
                "index": "x",
                "enrollmentOpen": "yes",
            }),
            3,
        );
        assert_eq!(normalized.name, "Division 3");
        assert_eq!(normalized.max_athletes, 0);
        assert_eq!(normalized.enrolled_athletes, 0);
        assert_eq!(normalized.fee, 0);
        assert_eq!(normalized.team_size, 1);
        assert_eq!(normalized.index, 3);
        assert!(normalized.enrollment_open);
    }

    #[test]
    fn test_division_truncates_numbers() {
        let normalized = normalize_division(
            &json!({
                "name": " Scaled ",
                "maxAthletes": "12.9",
                "enrolledAthletes": 3.7,
                "fee": 25.5,
                "teamSize": 2.2,
                "index": 0.4,
            }),
            2,
        );
        assert_eq!(normalized.name, "Scaled");
        assert_eq!(normalized.max_athletes, 12);
        assert_eq!(normalized.enrolled_athletes, 3);
        assert_eq!(normalized.fee, 25);
        assert_eq!(normalized.team_size, 2);
        assert_eq!(normalized.index, 1);
    }

    #[test]
    fn test_division_missing_index_uses_position() {
        let divisions = normalize_divisions(&json!([{ "name": "A" }, { "name": "B" }]));
        assert_eq!(divisions[0].index, 1);
        assert_eq!(divisions[1].index, 2);
    }

    #[test]
    fn test_divisions_sorted_by_index() {
        let divisions = normalize_divisions(&json!([
            { "name": "Third", "index": 3 },
            { "name": "First", "index": 1 },
            { "name": "Second", "index": 2 },
        ]));
        let names: Vec<_> = divisions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_divisions_non_array_is_empty() {
        assert!(normalize_divisions(&json!({ "name": "A" })).is_empty());
        assert!(normalize_divisions(&Value::Null).is_empty());
    }

    #[test]
    fn test_division_normalization_is_idempotent() {
        let raw = json!({ "name": "", "maxAthletes": 4, "enrolledAthletes": 10, "teamSize": -2 });
        let once = normalize_division(&raw, 2);
        let twice = normalize_division(&serde_json::to_value(&once).unwrap(), 7);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_competition_defaults() {
        let competition = normalize_competition(&json!({
            "id": "comp-x",
            "name": "Garage Games",
            "sku": "GG-1",
            "category": "Live Competition",
            "price": 35,
            "enrollmentType": "donation",
            "organizer": "  Box 42 ",
            "teamSize": 1.5,
            "status": "archived",
            "visibility": "Hidden",
            "enrollmentPeriodStart": "",
            "startDate": "2026-06-01",
            "endDate": "not a date",
        }));

        assert_eq!(competition.enrollment_type, EnrollmentType::Paid);
        assert_eq!(competition.organizer, "Box 42");
        assert_eq!(competition.sport, "");
        assert_eq!(competition.team_size, 1);
        assert_eq!(competition.status, CompetitionStatus::Pending);
        assert_eq!(competition.visibility, Visibility::Public);
        assert_eq!(competition.enrollment_period_start, None);
        assert_eq!(competition.start_date, NaiveDate::from_ymd_opt(2026, 6, 1));
        assert_eq!(competition.end_date, None);
        assert_eq!(competition.price, Decimal::from(35));
        assert!(competition.divisions.is_empty());
    }

    #[test]
    fn test_competition_keeps_valid_values() {
        let competition = normalize_competition(&json!({
            "id": "comp-y",
            "category": "Online Competition",
            "price": "19.99",
            "vat": 21,
            "enrollmentType": "free",
            "teamSize": "3",
            "status": "active",
            "visibility": "Private",
            "enrollmentOpen": 1,
        }));

        assert_eq!(competition.price, Decimal::new(1999, 2));
        assert_eq!(competition.vat, Some(Decimal::from(21)));
        assert_eq!(competition.enrollment_type, EnrollmentType::Free);
        assert_eq!(competition.team_size, 3);
        assert_eq!(competition.status, CompetitionStatus::Active);
        assert_eq!(competition.visibility, Visibility::Private);
        assert!(competition.enrollment_open);
    }

    #[test]
    fn test_competition_normalization_is_idempotent() {
        let raw = json!({
            "name": "Throwdown",
            "sku": "TD-1",
            "category": "Live",
            "price": 42.5,
            "vat": "7.5",
            "teamSize": "two",
            "divisions": [
                { "name": "B", "index": 2, "maxAthletes": 3, "enrolledAthletes": 8 },
                { "name": "A", "index": 1, "maxAthletes": 10 },
            ],
        });
        let once = normalize_competition(&raw);
        let twice = normalize_competition(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, twice);
        assert_eq!(once.divisions[0].name, "A");
        assert_eq!(once.divisions[1].enrolled_athletes, 3);
    }

    #[test]
    fn test_missing_id_is_generated() {
        let competition = normalize_competition(&json!({ "category": "Online" }));
        assert!(competition.id.starts_with("comp-"));
    }

    #[test]
    fn test_sanitize_drops_foreign_categories() {
        let competitions = sanitize_competitions(&json!([
            { "id": "a", "category": "Online Competition" },
            { "id": "b", "category": "Electronics" },
            { "id": "c" },
            { "id": "d", "category": "Live Competition" },
        ]));
        let ids: Vec<_> = competitions.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
        assert!(sanitize_competitions(&json!({ "id": "a" })).is_empty());
    }

    #[test]
    fn test_remove_last_division() {
        let divisions = vec![division(1), division(2), division(3)];
        let remaining = remove_division(&divisions, 2);
        let summary: Vec<_> = remaining.iter().map(|d| (d.name.as_str(), d.index)).collect();
        assert_eq!(summary, vec![("D1", 1), ("D2", 2)]);
    }

    #[test]
    fn test_remove_middle_division_reindexes() {
        let divisions = vec![division(1), division(2), division(3)];
        let remaining = remove_division(&divisions, 1);
        let summary: Vec<_> = remaining.iter().map(|d| (d.name.as_str(), d.index)).collect();
        assert_eq!(summary, vec![("D1", 1), ("D3", 2)]);
    }

    #[test]
    fn test_append_division() {
        let divisions = append_division(&[division(1)]);
        assert_eq!(divisions.len(), 2);
        assert_eq!(divisions[1].name, "Division 2");
        assert_eq!(divisions[1].index, 2);
    }

    #[test]
    fn test_sanitize_products() {
        let products = sanitize_products(&json!([
            { "id": "p1", "name": "Rower", "sku": "RW", "category": "Sports", "price": 999.0, "quantity": -2 },
            { "id": "p2", "name": "5K", "sku": "R5", "category": "Online Competition", "price": 20 },
            { "id": "p3", "name": "Shirt", "sku": "SH", "category": "Clothing", "price": 15 },
        ]));
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].quantity, Some(0));
        assert_eq!(products[1].quantity, None);
    }

    #[test]
    fn test_sanitize_athletes() {
        let athletes = sanitize_athletes(&json!([
            { "id": "a1", "userId": "user-001", "competitionId": "comp-001", "divisionIndex": 0, "name": "Ada", "boxName": " Byte " },
            { "id": "a2", "competitionId": "comp-001" },
        ]));
        assert_eq!(athletes.len(), 1);
        assert_eq!(athletes[0].division_index, 1);
        assert_eq!(athletes[0].box_name, "Byte");
    }
}
