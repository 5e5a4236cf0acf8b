use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::filters::OrderFilter;
use crate::domain::order::{CrmSummary, Order, OrderDraft, OrderInput};
use crate::domain::ports::{CustomerRepository, OrderRepository, ProductRepository};
use crate::domain::validation::{parse_id, parse_order_date};

pub struct OrderService<C, P, O> {
    customers: C,
    products: P,
    orders: O,
}

impl<C, P, O> OrderService<C, P, O>
where
    C: CustomerRepository,
    P: ProductRepository,
    O: OrderRepository,
{
    pub fn new(customers: C, products: P, orders: O) -> Self {
        Self {
            customers,
            products,
            orders,
        }
    }

    /// Resolves the customer and products, then persists the order with a
    /// total computed from the resolved products.
    pub fn create_order(&self, input: OrderInput) -> Result<Order, DomainError> {
        let invalid_customer = || DomainError::validation("Invalid customer ID");
        let customer_id = parse_id(&input.customer_id).ok_or_else(invalid_customer)?;
        let customer = self
            .customers
            .find_by_id(customer_id)?
            .ok_or_else(invalid_customer)?;

        let mut product_ids: Vec<Uuid> = input
            .product_ids
            .iter()
            .filter_map(|raw| parse_id(raw))
            .collect();
        product_ids.sort();
        product_ids.dedup();
        let products = if product_ids.is_empty() {
            Vec::new()
        } else {
            self.products.find_by_ids(&product_ids)?
        };

        let order_date = match input.order_date.as_deref() {
            Some(raw) => parse_order_date(raw)?,
            None => Utc::now(),
        };

        let order = self
            .orders
            .create(OrderDraft::new(&customer, &products, order_date)?)?;
        log::info!(
            "Created order {} for customer {} totalling {}",
            order.id,
            customer.id,
            order.total_amount
        );
        Ok(order)
    }

    pub fn get_order(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        self.orders.find_by_id(id)
    }

    pub fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, DomainError> {
        self.orders.list(filter)
    }

    pub fn count_orders(&self) -> Result<i64, DomainError> {
        self.orders.count()
    }

    pub fn total_revenue(&self) -> Result<BigDecimal, DomainError> {
        self.orders.total_revenue()
    }

    pub fn summary(&self) -> Result<CrmSummary, DomainError> {
        Ok(CrmSummary {
            customers_count: self.customers.count()?,
            orders_count: self.orders.count()?,
            total_revenue: self.orders.total_revenue()?,
        })
    }
}
