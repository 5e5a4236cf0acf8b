use async_graphql::{
    InputObject, InputValueError, InputValueResult, Scalar, ScalarType, SimpleObject, Value, ID,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use crate::domain::customer::{BulkCreateResult, Customer, CustomerCreated, CustomerInput};
use crate::domain::errors::DomainError;
use crate::domain::filters::{CustomerFilter, OrderFilter, ProductFilter};
use crate::domain::order::Order;
use crate::domain::product::{Product, RestockResult};
use crate::domain::validation::{parse_amount_bound, parse_id};

// ── Scalars ──────────────────────────────────────────────────────────────────

/// Decimal amount. Serialized as a string ("25.50"); accepted as a string or
/// a number on input.
#[derive(Debug, Clone, PartialEq)]
pub struct Decimal(pub String);

#[Scalar]
impl ScalarType for Decimal {
    fn parse(value: Value) -> InputValueResult<Self> {
        match value {
            Value::String(s) => Ok(Decimal(s)),
            Value::Number(n) => Ok(Decimal(n.to_string())),
            other => Err(InputValueError::expected_type(other)),
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.0.clone())
    }
}

impl From<&BigDecimal> for Decimal {
    fn from(value: &BigDecimal) -> Self {
        Decimal(value.with_scale(2).to_string())
    }
}

impl Decimal {
    fn to_bound(&self) -> Result<BigDecimal, DomainError> {
        parse_amount_bound(&self.0)
    }
}

// ── Output objects ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Customer")]
pub struct CustomerObject {
    pub id: ID,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Customer> for CustomerObject {
    fn from(c: Customer) -> Self {
        Self {
            id: ID(c.id.to_string()),
            name: c.name,
            email: c.email,
            phone: c.phone,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Product")]
pub struct ProductObject {
    pub id: ID,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
}

impl From<Product> for ProductObject {
    fn from(p: Product) -> Self {
        Self {
            id: ID(p.id.to_string()),
            price: Decimal::from(&p.price),
            name: p.name,
            stock: p.stock,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Order")]
pub struct OrderObject {
    pub id: ID,
    pub customer: CustomerObject,
    pub products: Vec<ProductObject>,
    /// Sum of the product prices when the order was placed.
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
}

impl From<Order> for OrderObject {
    fn from(o: Order) -> Self {
        Self {
            id: ID(o.id.to_string()),
            total_amount: Decimal::from(&o.total_amount),
            customer: o.customer.into(),
            products: o.products.into_iter().map(Into::into).collect(),
            order_date: o.order_date,
        }
    }
}

// ── Mutation payloads ────────────────────────────────────────────────────────

#[derive(Debug, SimpleObject)]
pub struct CreateCustomerPayload {
    pub customer: CustomerObject,
    pub message: String,
}

impl From<CustomerCreated> for CreateCustomerPayload {
    fn from(created: CustomerCreated) -> Self {
        Self {
            customer: created.customer.into(),
            message: created.message,
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct BulkCreateCustomersPayload {
    pub customers: Vec<CustomerObject>,
    pub errors: Vec<String>,
}

impl From<BulkCreateResult> for BulkCreateCustomersPayload {
    fn from(result: BulkCreateResult) -> Self {
        Self {
            customers: result.customers.into_iter().map(Into::into).collect(),
            errors: result.errors,
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct CreateProductPayload {
    pub product: ProductObject,
}

#[derive(Debug, SimpleObject)]
pub struct CreateOrderPayload {
    pub order: OrderObject,
}

#[derive(Debug, SimpleObject)]
pub struct UpdateLowStockProductsPayload {
    pub products: Vec<ProductObject>,
    pub message: String,
}

impl From<RestockResult> for UpdateLowStockProductsPayload {
    fn from(result: RestockResult) -> Self {
        Self {
            products: result.products.into_iter().map(Into::into).collect(),
            message: result.message,
        }
    }
}

// ── Inputs ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, InputObject)]
#[graphql(name = "CustomerInput")]
pub struct CustomerInputObject {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<CustomerInputObject> for CustomerInput {
    fn from(input: CustomerInputObject) -> Self {
        Self {
            name: input.name,
            email: input.email,
            phone: input.phone,
        }
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct CustomerFilterInput {
    pub name_icontains: Option<String>,
    pub email_icontains: Option<String>,
    pub created_at_gte: Option<DateTime<Utc>>,
    pub created_at_lte: Option<DateTime<Utc>>,
    /// Phone prefix, e.g. "+1".
    pub phone_pattern: Option<String>,
}

impl From<CustomerFilterInput> for CustomerFilter {
    fn from(f: CustomerFilterInput) -> Self {
        Self {
            name_icontains: f.name_icontains,
            email_icontains: f.email_icontains,
            created_at_gte: f.created_at_gte,
            created_at_lte: f.created_at_lte,
            phone_pattern: f.phone_pattern,
        }
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct ProductFilterInput {
    pub name_icontains: Option<String>,
    pub price_gte: Option<Decimal>,
    pub price_lte: Option<Decimal>,
    pub stock_gte: Option<i32>,
    pub stock_lte: Option<i32>,
}

impl TryFrom<ProductFilterInput> for ProductFilter {
    type Error = DomainError;

    fn try_from(f: ProductFilterInput) -> Result<Self, Self::Error> {
        Ok(Self {
            name_icontains: f.name_icontains,
            price_gte: f.price_gte.as_ref().map(Decimal::to_bound).transpose()?,
            price_lte: f.price_lte.as_ref().map(Decimal::to_bound).transpose()?,
            stock_gte: f.stock_gte,
            stock_lte: f.stock_lte,
        })
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct OrderFilterInput {
    pub total_amount_gte: Option<Decimal>,
    pub total_amount_lte: Option<Decimal>,
    pub order_date_gte: Option<DateTime<Utc>>,
    pub order_date_lte: Option<DateTime<Utc>>,
    pub customer_name: Option<String>,
    pub product_name: Option<String>,
    pub product_id: Option<ID>,
}

impl TryFrom<OrderFilterInput> for OrderFilter {
    type Error = DomainError;

    fn try_from(f: OrderFilterInput) -> Result<Self, Self::Error> {
        let product_id = match &f.product_id {
            Some(raw) => Some(
                parse_id(raw)
                    .ok_or_else(|| DomainError::validation(format!("Invalid product ID '{}'", raw.0)))?,
            ),
            None => None,
        };
        Ok(Self {
            total_amount_gte: f.total_amount_gte.as_ref().map(Decimal::to_bound).transpose()?,
            total_amount_lte: f.total_amount_lte.as_ref().map(Decimal::to_bound).transpose()?,
            order_date_gte: f.order_date_gte,
            order_date_lte: f.order_date_lte,
            customer_name: f.customer_name,
            product_name: f.product_name,
            product_id,
        })
    }
}
