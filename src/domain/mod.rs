pub mod customer;
pub mod errors;
pub mod filters;
pub mod order;
pub mod ports;
pub mod product;
pub mod validation;
