//! Seed dataset used to populate empty storage and to repair it after a
//! schema change. Records go through the same sanitizers as stored data, so
//! the seed is always in canonical shape.

use chrono::NaiveDate;
use serde_json::json;

use crate::models::{Athlete, Competition, Product, User};
use crate::services::normalization::{sanitize_athletes, sanitize_competitions, sanitize_products};

pub fn competitions() -> Vec<Competition> {
    sanitize_competitions(&json!([
        {
            "id": "comp-001",
            "name": "Winter Throwdown",
            "sku": "WTD-2026",
            "category": "Live Competition",
            "price": 45.0,
            "vat": 21.0,
            "enrollmentType": "paid",
            "organizer": "Iron Harbor Athletics",
            "sport": "Functional Fitness",
            "teamSize": 1,
            "status": "active",
            "enrollmentOpen": true,
            "enrollmentPeriodStart": "2026-01-05",
            "enrollmentPeriodEnd": "2026-02-20",
            "visibility": "Public",
            "startDate": "2026-03-07",
            "endDate": "2026-03-08",
            "description": "Two-day individual competition with scaled and RX divisions.",
            "divisions": [
                { "name": "RX", "enrollmentOpen": true, "maxAthletes": 40, "enrolledAthletes": 12, "fee": 45, "teamSize": 1, "index": 1 },
                { "name": "Scaled", "enrollmentOpen": true, "maxAthletes": 40, "enrolledAthletes": 18, "fee": 35, "teamSize": 1, "index": 2 },
            ],
        },
        {
            "id": "comp-002",
            "name": "Open Qualifier Online",
            "sku": "OQO-2026",
            "category": "Online Competition",
            "price": 20.0,
            "enrollmentType": "paid",
            "organizer": "Reppi League",
            "sport": "Functional Fitness",
            "teamSize": 1,
            "status": "active",
            "enrollmentOpen": true,
            "enrollmentPeriodStart": "2026-02-01",
            "enrollmentPeriodEnd": "2026-03-15",
            "visibility": "Public",
            "startDate": "2026-03-20",
            "endDate": "2026-04-10",
            "description": "Three online workouts, scores submitted by video.",
            "divisions": [
                { "name": "Masters 35+", "enrollmentOpen": true, "maxAthletes": 200, "enrolledAthletes": 64, "fee": 20, "teamSize": 1, "index": 1 },
                { "name": "Open", "enrollmentOpen": true, "maxAthletes": 500, "enrolledAthletes": 211, "fee": 20, "teamSize": 1, "index": 2 },
            ],
        },
        {
            "id": "comp-003",
            "name": "Community Row Challenge",
            "sku": "CRC-2026",
            "category": "Online Competition",
            "price": 0.0,
            "enrollmentType": "free",
            "organizer": "Reppi League",
            "sport": "Rowing",
            "teamSize": 1,
            "status": "pending",
            "enrollmentOpen": false,
            "visibility": "Private",
            "startDate": "2026-05-01",
            "endDate": "2026-05-31",
            "divisions": [
                { "name": "Division 1", "enrollmentOpen": false, "maxAthletes": 100, "enrolledAthletes": 0, "fee": 0, "teamSize": 1, "index": 1 },
            ],
        },
        {
            "id": "comp-004",
            "name": "Summer Team Series",
            "sku": "STS-2026",
            "category": "Live Competition",
            "price": 120.0,
            "vat": 21.0,
            "enrollmentType": "paid",
            "organizer": "Iron Harbor Athletics",
            "sport": "Functional Fitness",
            "teamSize": 3,
            "status": "pending",
            "enrollmentOpen": true,
            "enrollmentPeriodStart": "2026-04-01",
            "enrollmentPeriodEnd": "2026-06-01",
            "visibility": "Public",
            "startDate": "2026-06-20",
            "endDate": "2026-06-21",
            "description": "Teams of three across two divisions.",
            "divisions": [
                { "name": "Elite Teams", "enrollmentOpen": true, "maxAthletes": 30, "enrolledAthletes": 1, "fee": 120, "teamSize": 3, "index": 1 },
                { "name": "Intermediate Teams", "enrollmentOpen": true, "maxAthletes": 30, "enrolledAthletes": 1, "fee": 100, "teamSize": 3, "index": 2 },
            ],
        },
    ]))
}

pub fn products() -> Vec<Product> {
    sanitize_products(&json!([
        { "id": "prod-001", "name": "Competition Kettlebell 16kg", "sku": "KB-16", "category": "Sports", "price": 79.9, "quantity": 24, "lowStockThreshold": 5 },
        { "id": "prod-002", "name": "Speed Jump Rope", "sku": "JR-SPD", "category": "Sports", "price": 19.5, "quantity": 3, "lowStockThreshold": 10 },
        { "id": "prod-003", "name": "Event T-Shirt", "sku": "TS-EVT", "category": "Clothing", "price": 25.0, "quantity": 0, "lowStockThreshold": 10 },
        { "id": "prod-004", "name": "Electrolyte Drink", "sku": "EL-DRK", "category": "Food & Beverage", "price": 2.5, "quantity": 340, "lowStockThreshold": 50 },
        { "id": "prod-005", "name": "Interval Timer", "sku": "TMR-01", "category": "Electronics", "price": 149.0, "quantity": 8, "lowStockThreshold": 2 },
        { "id": "prod-006", "name": "Chalk Block", "sku": "CHK-BLK", "category": "Home & Garden", "price": 4.0 },
    ]))
}

fn user(
    id: &str,
    first_name: &str,
    last_name: &str,
    email: &str,
    registered: (i32, u32, u32),
) -> User {
    let (year, month, day) = registered;
    User {
        id: id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        registered_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
    }
}

pub fn users() -> Vec<User> {
    vec![
        user("user-001", "Ada", "Lovelace", "ada.lovelace@example.com", (2026, 1, 10)),
        user("user-002", "Grace", "Hopper", "grace.hopper@example.com", (2026, 1, 18)),
        user("user-003", "Katherine", "Johnson", "katherine.johnson@example.com", (2026, 2, 4)),
    ]
}

pub fn athletes() -> Vec<Athlete> {
    sanitize_athletes(&json!([
        { "id": "ath-001", "userId": "user-001", "competitionId": "comp-001", "divisionIndex": 1, "name": "Ada Lovelace", "boxName": "Byte Sprinter" },
        { "id": "ath-002", "userId": "user-001", "competitionId": "comp-002", "divisionIndex": 2, "name": "Ada Lovelace", "boxName": "Algorithm Arrow" },
        { "id": "ath-003", "userId": "user-002", "competitionId": "comp-004", "divisionIndex": 1, "name": "Grace Hopper", "boxName": "Kernel Queen" },
        { "id": "ath-004", "userId": "user-003", "competitionId": "comp-004", "divisionIndex": 2, "name": "Katherine Johnson", "boxName": "Trajectory Titan" },
    ]))
}
