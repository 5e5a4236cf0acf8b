use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::customer::Customer;
use super::errors::DomainError;
use super::product::Product;
use super::validation::validate_order_total;

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub customer: Customer,
    pub products: Vec<Product>,
    pub total_amount: BigDecimal,
    pub order_date: DateTime<Utc>,
}

/// Unvalidated order request. Ids are kept as strings so that unparsable
/// product ids can be skipped the same way unknown ones are.
#[derive(Debug, Clone, Default)]
pub struct OrderInput {
    pub customer_id: String,
    pub product_ids: Vec<String>,
    pub order_date: Option<String>,
}

/// Sum of the product prices, at cent precision.
pub fn order_total(products: &[Product]) -> BigDecimal {
    products
        .iter()
        .fold(BigDecimal::from(0), |acc, p| acc + &p.price)
        .with_scale(2)
}

/// An order ready to be persisted.
///
/// The total is derived from the resolved products here and cannot be set
/// any other way.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    customer_id: Uuid,
    product_ids: Vec<Uuid>,
    total_amount: BigDecimal,
    order_date: DateTime<Utc>,
}

impl OrderDraft {
    pub fn new(
        customer: &Customer,
        products: &[Product],
        order_date: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if products.is_empty() {
            return Err(DomainError::validation(
                "At least one valid product must be selected",
            ));
        }
        let total_amount = order_total(products);
        validate_order_total(&total_amount)?;
        let mut product_ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
        product_ids.sort();
        product_ids.dedup();
        Ok(Self {
            customer_id: customer.id,
            product_ids,
            total_amount,
            order_date,
        })
    }

    pub fn customer_id(&self) -> Uuid {
        self.customer_id
    }

    pub fn product_ids(&self) -> &[Uuid] {
        &self.product_ids
    }

    pub fn total_amount(&self) -> &BigDecimal {
        &self.total_amount
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }
}

/// Headline figures for the periodic CRM report.
#[derive(Debug, Clone, PartialEq)]
pub struct CrmSummary {
    pub customers_count: i64,
    pub orders_count: i64,
    pub total_revenue: BigDecimal,
}
