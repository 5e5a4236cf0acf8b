use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::validation::{parse_price, validate_name, validate_stock};

/// Products with stock strictly below this are replenished.
pub const LOW_STOCK_THRESHOLD: i32 = 10;
/// Units added to each low-stock product per replenishment run.
pub const RESTOCK_INCREMENT: i32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub stock: i32,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: BigDecimal,
    pub stock: i32,
}

impl TryFrom<&ProductInput> for NewProduct {
    type Error = DomainError;

    fn try_from(input: &ProductInput) -> Result<Self, Self::Error> {
        let price = parse_price(&input.price)?;
        let stock = validate_stock(input.stock)?;
        Ok(NewProduct {
            name: validate_name(&input.name)?,
            price,
            stock,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RestockResult {
    pub products: Vec<Product>,
    pub message: String,
}

impl RestockResult {
    pub fn new(products: Vec<Product>) -> Self {
        let message = if products.is_empty() {
            "No low-stock products found".to_string()
        } else {
            format!("Updated {} low-stock product(s)", products.len())
        };
        Self { products, message }
    }
}
