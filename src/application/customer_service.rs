use uuid::Uuid;

use crate::domain::customer::{
    BulkCreateResult, Customer, CustomerCreated, CustomerInput, NewCustomer,
};
use crate::domain::errors::DomainError;
use crate::domain::filters::CustomerFilter;
use crate::domain::ports::CustomerRepository;

pub struct CustomerService<R> {
    repo: R,
}

impl<R: CustomerRepository> CustomerService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_customer(&self, input: CustomerInput) -> Result<CustomerCreated, DomainError> {
        let new = NewCustomer::try_from(&input)?;
        if self.repo.email_exists(&new.email)? {
            return Err(DomainError::validation("Email already exists"));
        }
        let customer = self.repo.insert(new)?;
        log::info!("Created customer {} <{}>", customer.id, customer.email);
        Ok(CustomerCreated {
            customer,
            message: "Customer created successfully".to_string(),
        })
    }

    /// Validates every record, then inserts the valid ones in a single
    /// transaction. Rejected records end up in `errors`; the rest are kept.
    pub fn bulk_create_customers(
        &self,
        inputs: Vec<CustomerInput>,
    ) -> Result<BulkCreateResult, DomainError> {
        let mut result = BulkCreateResult::default();
        let mut accepted = Vec::with_capacity(inputs.len());
        // Field errors per input, `None` where the record goes to the store.
        let mut field_errors = Vec::with_capacity(inputs.len());
        for input in &inputs {
            match NewCustomer::try_from(input) {
                Ok(new) => {
                    accepted.push(new);
                    field_errors.push(None);
                }
                Err(e) => field_errors.push(Some(e)),
            }
        }

        let mut outcomes = self.repo.insert_batch(accepted)?.into_iter();
        for (input, field_error) in inputs.iter().zip(field_errors) {
            let outcome = match field_error {
                Some(e) => Err(e),
                None => outcomes.next().unwrap_or_else(|| {
                    Err(DomainError::Internal("missing insert outcome".into()))
                }),
            };
            match outcome {
                Ok(customer) => result.customers.push(customer),
                Err(e @ DomainError::Validation(_)) => result.reject(&input.email, &e),
                Err(e) => {
                    log::error!("Bulk insert of {} failed: {}", input.email.trim(), e);
                    result.reject(&input.email, &e);
                }
            }
        }

        log::info!(
            "Bulk customer import: {} created, {} rejected",
            result.customers.len(),
            result.errors.len()
        );
        Ok(result)
    }

    pub fn get_customer(&self, id: Uuid) -> Result<Option<Customer>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn list_customers(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, DomainError> {
        self.repo.list(filter)
    }

    pub fn count_customers(&self) -> Result<i64, DomainError> {
        self.repo.count()
    }
}
