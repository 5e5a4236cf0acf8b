use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::errors::DomainError;
use crate::domain::filters::CustomerFilter;
use crate::domain::ports::CustomerRepository;
use crate::schema::customers;

use super::contains_pattern;
use super::models::{CustomerRow, NewCustomerRow};

pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Inserts one customer, mapping the unique-email violation onto the same
/// validation error the pre-insert check produces.
fn insert_customer(conn: &mut PgConnection, new: &NewCustomer) -> Result<Customer, DomainError> {
    let row: CustomerRow = diesel::insert_into(customers::table)
        .values(&NewCustomerRow {
            id: Uuid::new_v4(),
            name: &new.name,
            email: &new.email,
            phone: new.phone.as_deref(),
        })
        .returning(CustomerRow::as_returning())
        .get_result(conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                DomainError::validation("Email already exists")
            }
            other => other.into(),
        })?;
    Ok(row.into())
}

impl CustomerRepository for DieselCustomerRepository {
    fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let exists: bool = diesel::select(diesel::dsl::exists(
            customers::table.filter(customers::email.eq(email)),
        ))
        .get_result(&mut conn)?;
        Ok(exists)
    }

    fn insert(&self, customer: NewCustomer) -> Result<Customer, DomainError> {
        let mut conn = self.pool.get()?;
        insert_customer(&mut conn, &customer)
    }

    fn insert_batch(
        &self,
        batch: Vec<NewCustomer>,
    ) -> Result<Vec<Result<Customer, DomainError>>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // Nested transactions are savepoints: a failed record rolls back
            // to its own savepoint and the batch carries on.
            Ok(batch
                .iter()
                .map(|new| conn.transaction(|conn| insert_customer(conn, new)))
                .collect())
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, DomainError> {
        let mut conn = self.pool.get()?;
        let row: Option<CustomerRow> = customers::table
            .filter(customers::id.eq(id))
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Into::into))
    }

    fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = customers::table
            .select(CustomerRow::as_select())
            .into_boxed();
        if let Some(name) = &filter.name_icontains {
            query = query.filter(customers::name.ilike(contains_pattern(name)));
        }
        if let Some(email) = &filter.email_icontains {
            query = query.filter(customers::email.ilike(contains_pattern(email)));
        }
        if let Some(from) = filter.created_at_gte {
            query = query.filter(customers::created_at.ge(from));
        }
        if let Some(to) = filter.created_at_lte {
            query = query.filter(customers::created_at.le(to));
        }
        if let Some(prefix) = &filter.phone_pattern {
            let escaped = contains_pattern(prefix);
            // Drop the leading wildcard: phone patterns match prefixes.
            query = query.filter(customers::phone.like(escaped[1..].to_string()));
        }

        let rows: Vec<CustomerRow> = query
            .order((customers::created_at.asc(), customers::id.asc()))
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn count(&self) -> Result<i64, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(customers::table.count().get_result(&mut conn)?)
    }
}
