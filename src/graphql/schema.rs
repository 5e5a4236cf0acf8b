use std::sync::Arc;

use actix_web::web;
use async_graphql::{Context, EmptySubscription, ErrorExtensions, Schema};

use crate::application::CrmServices;
use crate::domain::errors::DomainError;

use super::mutation::MutationRoot;
use super::query::QueryRoot;

pub type CrmSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(services: Arc<CrmServices>) -> CrmSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(services)
        .finish()
}

impl ErrorExtensions for DomainError {
    fn extend(&self) -> async_graphql::Error {
        let (message, code) = match self {
            DomainError::Validation(msg) => (msg.clone(), "VALIDATION_ERROR"),
            DomainError::Internal(msg) => {
                log::error!("GraphQL resolver failed: {}", msg);
                ("Internal server error".to_string(), "INTERNAL_ERROR")
            }
        };
        async_graphql::Error::new(message).extend_with(|_, e| e.set("code", code))
    }
}

/// Runs a service call on the blocking pool; Diesel connections are sync.
pub(crate) async fn run_blocking<T, F>(ctx: &Context<'_>, f: F) -> async_graphql::Result<T>
where
    F: FnOnce(&CrmServices) -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    let services = ctx.data::<Arc<CrmServices>>()?.clone();
    web::block(move || f(&services))
        .await
        .map_err(|e| DomainError::Internal(e.to_string()).extend())?
        .map_err(|e| e.extend())
}
