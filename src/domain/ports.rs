use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::customer::{Customer, NewCustomer};
use super::errors::DomainError;
use super::filters::{CustomerFilter, OrderFilter, ProductFilter};
use super::order::{Order, OrderDraft};
use super::product::{NewProduct, Product};

pub trait CustomerRepository: Send + Sync + 'static {
    fn email_exists(&self, email: &str) -> Result<bool, DomainError>;
    /// Fails with a validation error when the email is already taken.
    fn insert(&self, customer: NewCustomer) -> Result<Customer, DomainError>;
    /// Inserts every record inside one transaction, isolating each record so
    /// that a failed insert does not abort the others. The outer `Result` is
    /// for failures of the transaction itself.
    fn insert_batch(
        &self,
        customers: Vec<NewCustomer>,
    ) -> Result<Vec<Result<Customer, DomainError>>, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, DomainError>;
    fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, DomainError>;
    fn count(&self) -> Result<i64, DomainError>;
}

pub trait ProductRepository: Send + Sync + 'static {
    fn insert(&self, product: NewProduct) -> Result<Product, DomainError>;
    /// Unknown ids are skipped.
    fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError>;
    fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError>;
    /// Adds `increment` to every product whose stock is below `threshold` and
    /// returns the updated rows as stored.
    fn restock_below(&self, threshold: i32, increment: i32) -> Result<Vec<Product>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, draft: OrderDraft) -> Result<Order, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;
    /// Newest first.
    fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, DomainError>;
    fn count(&self) -> Result<i64, DomainError>;
    fn total_revenue(&self) -> Result<BigDecimal, DomainError>;
}

impl<T: CustomerRepository + ?Sized> CustomerRepository for Arc<T> {
    fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        (**self).email_exists(email)
    }

    fn insert(&self, customer: NewCustomer) -> Result<Customer, DomainError> {
        (**self).insert(customer)
    }

    fn insert_batch(
        &self,
        customers: Vec<NewCustomer>,
    ) -> Result<Vec<Result<Customer, DomainError>>, DomainError> {
        (**self).insert_batch(customers)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, DomainError> {
        (**self).find_by_id(id)
    }

    fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, DomainError> {
        (**self).list(filter)
    }

    fn count(&self) -> Result<i64, DomainError> {
        (**self).count()
    }
}

impl<T: ProductRepository + ?Sized> ProductRepository for Arc<T> {
    fn insert(&self, product: NewProduct) -> Result<Product, DomainError> {
        (**self).insert(product)
    }

    fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        (**self).find_by_ids(ids)
    }

    fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        (**self).list(filter)
    }

    fn restock_below(&self, threshold: i32, increment: i32) -> Result<Vec<Product>, DomainError> {
        (**self).restock_below(threshold, increment)
    }
}

impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    fn create(&self, draft: OrderDraft) -> Result<Order, DomainError> {
        (**self).create(draft)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        (**self).find_by_id(id)
    }

    fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, DomainError> {
        (**self).list(filter)
    }

    fn count(&self) -> Result<i64, DomainError> {
        (**self).count()
    }

    fn total_revenue(&self) -> Result<BigDecimal, DomainError> {
        (**self).total_revenue()
    }
}
