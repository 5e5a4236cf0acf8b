pub mod customer_repo;
pub mod memory;
pub mod models;
pub mod order_repo;
pub mod product_repo;

use crate::domain::errors::DomainError;

pub use customer_repo::DieselCustomerRepository;
pub use memory::InMemoryCrm;
pub use order_repo::DieselOrderRepository;
pub use product_repo::DieselProductRepository;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

/// `ILIKE` pattern matching `needle` anywhere, with wildcards escaped.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}


#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(contains_pattern("pen"), "%pen%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }
}
