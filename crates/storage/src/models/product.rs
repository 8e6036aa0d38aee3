use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProductCategory {
    #[default]
    Electronics,
    Clothing,
    #[serde(rename = "Food & Beverage")]
    FoodAndBeverage,
    #[serde(rename = "Home & Garden")]
    HomeAndGarden,
    Sports,
    Beauty,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Clothing => "Clothing",
            Self::FoodAndBeverage => "Food & Beverage",
            Self::HomeAndGarden => "Home & Garden",
            Self::Sports => "Sports",
            Self::Beauty => "Beauty",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: ProductCategory,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<u32>,
}

impl Product {
    pub fn stock_status(&self) -> StockStatus {
        match (self.quantity, self.low_stock_threshold) {
            (None, _) => StockStatus::InStock,
            (Some(0), _) => StockStatus::OutOfStock,
            (Some(quantity), Some(threshold)) if quantity <= threshold => StockStatus::LowStock,
            _ => StockStatus::InStock,
        }
    }

    /// Stock value: price times quantity, zero when quantity is untracked
    pub fn stock_value(&self) -> Decimal {
        self.price * Decimal::from(self.quantity.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: Option<u32>, threshold: Option<u32>) -> Product {
        Product {
            id: "prod-1".to_string(),
            name: "Kettlebell".to_string(),
            sku: "KB-16".to_string(),
            category: ProductCategory::Sports,
            price: Decimal::new(4999, 2),
            quantity,
            low_stock_threshold: threshold,
        }
    }

    #[test]
    fn test_stock_status() {
        assert_eq!(product(None, Some(5)).stock_status(), StockStatus::InStock);
        assert_eq!(product(Some(0), Some(5)).stock_status(), StockStatus::OutOfStock);
        assert_eq!(product(Some(5), Some(5)).stock_status(), StockStatus::LowStock);
        assert_eq!(product(Some(6), Some(5)).stock_status(), StockStatus::InStock);
        assert_eq!(product(Some(1), None).stock_status(), StockStatus::InStock);
    }

    #[test]
    fn test_stock_value() {
        assert_eq!(product(Some(3), None).stock_value(), Decimal::new(14997, 2));
        assert_eq!(product(None, None).stock_value(), Decimal::ZERO);
    }

    #[test]
    fn test_category_labels_round_trip_through_serde() {
        let json = serde_json::to_value(ProductCategory::FoodAndBeverage).unwrap();
        assert_eq!(json, serde_json::json!("Food & Beverage"));
    }
}
