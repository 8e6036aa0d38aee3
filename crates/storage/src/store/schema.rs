use serde::Serialize;
use serde_json::Value;

use crate::models::{Athlete, Competition, Product};
use crate::seed;
use crate::services::normalization::{sanitize_athletes, sanitize_competitions, sanitize_products};

/// Record type stored as one JSON array under a single key
pub trait RecordSchema {
    type Record: Serialize + Clone;

    /// Used in log lines
    const LABEL: &'static str;

    /// Known-good collection used to populate or repair storage
    fn seed() -> Vec<Self::Record>;

    /// Repairs a parsed array, dropping records that do not belong here
    fn sanitize(raw: &Value) -> Vec<Self::Record>;
}

pub struct CompetitionSchema;

impl RecordSchema for CompetitionSchema {
    type Record = Competition;
    const LABEL: &'static str = "competitions";

    fn seed() -> Vec<Competition> {
        seed::competitions()
    }

    fn sanitize(raw: &Value) -> Vec<Competition> {
        sanitize_competitions(raw)
    }
}

pub struct ProductSchema;

impl RecordSchema for ProductSchema {
    type Record = Product;
    const LABEL: &'static str = "products";

    fn seed() -> Vec<Product> {
        seed::products()
    }

    fn sanitize(raw: &Value) -> Vec<Product> {
        sanitize_products(raw)
    }
}

pub struct AthleteSchema;

impl RecordSchema for AthleteSchema {
    type Record = Athlete;
    const LABEL: &'static str = "athletes";

    fn seed() -> Vec<Athlete> {
        seed::athletes()
    }

    fn sanitize(raw: &Value) -> Vec<Athlete> {
        sanitize_athletes(raw)
    }
}
