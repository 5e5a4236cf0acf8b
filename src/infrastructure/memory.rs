//! In-process repository backed by a mutex-guarded store.
//!
//! Implements every port with the same observable semantics as the Diesel
//! repositories; used for tests and for running the API without a database.

use std::sync::{Arc, Mutex, MutexGuard};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::errors::DomainError;
use crate::domain::filters::{CustomerFilter, OrderFilter, ProductFilter};
use crate::domain::order::{Order, OrderDraft};
use crate::domain::ports::{CustomerRepository, OrderRepository, ProductRepository};
use crate::domain::product::{NewProduct, Product};

#[derive(Debug, Clone)]
struct StoredOrder {
    id: Uuid,
    customer_id: Uuid,
    product_ids: Vec<Uuid>,
    total_amount: BigDecimal,
    order_date: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    customers: Vec<Customer>,
    products: Vec<Product>,
    orders: Vec<StoredOrder>,
}

impl State {
    fn insert_customer(&mut self, new: NewCustomer) -> Result<Customer, DomainError> {
        if self.customers.iter().any(|c| c.email == new.email) {
            return Err(DomainError::validation("Email already exists"));
        }
        let customer = Customer {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            created_at: Utc::now(),
        };
        self.customers.push(customer.clone());
        Ok(customer)
    }

    fn hydrate(&self, stored: &StoredOrder) -> Result<Order, DomainError> {
        let customer = self
            .customers
            .iter()
            .find(|c| c.id == stored.customer_id)
            .cloned()
            .ok_or_else(|| {
                DomainError::Internal(format!("order {} has no customer", stored.id))
            })?;
        let products = self
            .products
            .iter()
            .filter(|p| stored.product_ids.contains(&p.id))
            .cloned()
            .collect();
        Ok(Order {
            id: stored.id,
            customer,
            products,
            total_amount: stored.total_amount.clone(),
            order_date: stored.order_date,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCrm {
    state: Arc<Mutex<State>>,
}

impl InMemoryCrm {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, DomainError> {
        self.state
            .lock()
            .map_err(|_| DomainError::Internal("in-memory store poisoned".to_string()))
    }
}

impl CustomerRepository for InMemoryCrm {
    fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.state()?.customers.iter().any(|c| c.email == email))
    }

    fn insert(&self, customer: NewCustomer) -> Result<Customer, DomainError> {
        self.state()?.insert_customer(customer)
    }

    fn insert_batch(
        &self,
        customers: Vec<NewCustomer>,
    ) -> Result<Vec<Result<Customer, DomainError>>, DomainError> {
        let mut state = self.state()?;
        Ok(customers
            .into_iter()
            .map(|c| state.insert_customer(c))
            .collect())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, DomainError> {
        Ok(self.state()?.customers.iter().find(|c| c.id == id).cloned())
    }

    fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, DomainError> {
        Ok(self
            .state()?
            .customers
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    fn count(&self) -> Result<i64, DomainError> {
        Ok(self.state()?.customers.len() as i64)
    }
}

impl ProductRepository for InMemoryCrm {
    fn insert(&self, product: NewProduct) -> Result<Product, DomainError> {
        let product = Product {
            id: Uuid::new_v4(),
            name: product.name,
            price: product.price,
            stock: product.stock,
            created_at: Utc::now(),
        };
        self.state()?.products.push(product.clone());
        Ok(product)
    }

    fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .state()?
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .state()?
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    fn restock_below(&self, threshold: i32, increment: i32) -> Result<Vec<Product>, DomainError> {
        let mut state = self.state()?;
        let mut updated = Vec::new();
        for product in state.products.iter_mut().filter(|p| p.stock < threshold) {
            product.stock += increment;
            updated.push(product.clone());
        }
        Ok(updated)
    }
}

impl OrderRepository for InMemoryCrm {
    fn create(&self, draft: OrderDraft) -> Result<Order, DomainError> {
        let mut state = self.state()?;
        if !state.customers.iter().any(|c| c.id == draft.customer_id()) {
            return Err(DomainError::validation("Invalid customer ID"));
        }
        let stored = StoredOrder {
            id: Uuid::new_v4(),
            customer_id: draft.customer_id(),
            product_ids: draft.product_ids().to_vec(),
            total_amount: draft.total_amount().clone(),
            order_date: draft.order_date(),
        };
        let order = state.hydrate(&stored)?;
        state.orders.push(stored);
        Ok(order)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let state = self.state()?;
        state
            .orders
            .iter()
            .find(|o| o.id == id)
            .map(|o| state.hydrate(o))
            .transpose()
    }

    fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, DomainError> {
        let state = self.state()?;
        let mut orders = Vec::new();
        for stored in &state.orders {
            let order = state.hydrate(stored)?;
            if filter.matches(&order) {
                orders.push(order);
            }
        }
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    fn count(&self) -> Result<i64, DomainError> {
        Ok(self.state()?.orders.len() as i64)
    }

    fn total_revenue(&self) -> Result<BigDecimal, DomainError> {
        Ok(self
            .state()?
            .orders
            .iter()
            .fold(BigDecimal::from(0), |acc, o| acc + &o.total_amount)
            .with_scale(2))
    }
}
