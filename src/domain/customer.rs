use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::validation::{validate_email, validate_name, validate_phone};

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Unvalidated customer fields as received from a caller.
#[derive(Debug, Clone, Default)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// A customer that passed field validation and is ready to insert.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl TryFrom<&CustomerInput> for NewCustomer {
    type Error = DomainError;

    fn try_from(input: &CustomerInput) -> Result<Self, Self::Error> {
        Ok(NewCustomer {
            name: validate_name(&input.name)?,
            email: validate_email(&input.email)?,
            phone: validate_phone(input.phone.as_deref())?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CustomerCreated {
    pub customer: Customer,
    pub message: String,
}

/// Outcome of a bulk insert: partial success is allowed.
#[derive(Debug, Clone, Default)]
pub struct BulkCreateResult {
    pub customers: Vec<Customer>,
    /// One `"<email> - <reason>"` entry per rejected record.
    pub errors: Vec<String>,
}

impl BulkCreateResult {
    pub(crate) fn reject(&mut self, email: &str, err: &DomainError) {
        self.errors.push(format!("{} - {}", email.trim(), err));
    }
}
