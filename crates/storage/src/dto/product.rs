use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::validation::{FormErrors, error, is_non_negative_decimal, parse_decimal, require};
use crate::models::{Product, ProductCategory, StockStatus};

pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductForm {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[validate(custom(function = "validate_sku"))]
    pub sku: String,

    pub category: ProductCategory,

    #[validate(custom(function = "validate_price"))]
    pub price: String,

    #[validate(custom(function = "validate_quantity"))]
    pub quantity: String,

    pub low_stock_threshold: String,
}

impl ProductForm {
    pub fn validate_form(&self) -> FormErrors {
        FormErrors::from_validation(self.validate())
    }

    pub(crate) fn price_value(&self) -> Decimal {
        parse_decimal(&self.price).unwrap_or(Decimal::ZERO)
    }

    pub(crate) fn quantity_value(&self) -> u32 {
        parse_count(&self.quantity).unwrap_or(0)
    }

    /// Blank, unparseable and zero thresholds all fall back to the default
    pub(crate) fn low_stock_threshold_value(&self) -> u32 {
        parse_count(&self.low_stock_threshold)
            .filter(|threshold| *threshold != 0)
            .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD)
    }
}

fn parse_count(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_products: usize,
    pub total_value: Decimal,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
}

impl InventoryStats {
    pub fn from_products(products: &[Product]) -> Self {
        Self {
            total_products: products.len(),
            total_value: products.iter().map(Product::stock_value).sum(),
            low_stock_count: products
                .iter()
                .filter(|p| p.stock_status() == StockStatus::LowStock)
                .count(),
            out_of_stock_count: products
                .iter()
                .filter(|p| p.stock_status() == StockStatus::OutOfStock)
                .count(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<ProductCategory>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(search) if !search.is_empty() => {
                let search = search.to_lowercase();
                product.name.to_lowercase().contains(&search)
                    || product.sku.to_lowercase().contains(&search)
            }
            _ => true,
        };

        matches_search && self.category.is_none_or(|category| product.category == category)
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    require(name, "Product name is required.")
}

fn validate_sku(sku: &str) -> Result<(), ValidationError> {
    require(sku, "SKU is required.")
}

fn validate_price(price: &str) -> Result<(), ValidationError> {
    if is_non_negative_decimal(price) {
        Ok(())
    } else {
        Err(error("invalid_price", "Enter a valid price."))
    }
}

fn validate_quantity(quantity: &str) -> Result<(), ValidationError> {
    if parse_count(quantity).is_some() {
        Ok(())
    } else {
        Err(error("invalid_quantity", "Enter a valid quantity."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            name: "Jump Rope".to_string(),
            sku: "jr-01".to_string(),
            category: ProductCategory::Sports,
            price: "12.50".to_string(),
            quantity: "30".to_string(),
            low_stock_threshold: "".to_string(),
        }
    }

    #[test]
    fn test_valid_product_form() {
        assert!(form().validate_form().is_empty());
    }

    #[test]
    fn test_invalid_product_form() {
        let errors = ProductForm {
            name: "".to_string(),
            price: "free".to_string(),
            quantity: "-3".to_string(),
            ..form()
        }
        .validate_form();
        assert_eq!(errors.get("name"), Some("Product name is required."));
        assert_eq!(errors.get("price"), Some("Enter a valid price."));
        assert_eq!(errors.get("quantity"), Some("Enter a valid quantity."));
        assert!(!errors.contains("sku"));
    }

    #[test]
    fn test_price_must_fit_stored_amount() {
        let huge = ProductForm {
            price: "1e29".to_string(),
            ..form()
        };
        assert_eq!(huge.validate_form().get("price"), Some("Enter a valid price."));

        let scientific = ProductForm {
            price: "1.25e1".to_string(),
            ..form()
        };
        assert!(scientific.validate_form().is_empty());
        assert_eq!(scientific.price_value(), Decimal::new(125, 1));
    }

    #[test]
    fn test_threshold_defaults() {
        assert_eq!(form().low_stock_threshold_value(), 10);
        let zero = ProductForm {
            low_stock_threshold: "0".to_string(),
            ..form()
        };
        assert_eq!(zero.low_stock_threshold_value(), 10);
        let five = ProductForm {
            low_stock_threshold: "5".to_string(),
            ..form()
        };
        assert_eq!(five.low_stock_threshold_value(), 5);
    }
}
