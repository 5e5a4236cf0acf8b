pub mod customer_service;
pub mod order_service;
pub mod product_service;

use std::sync::Arc;

use crate::domain::ports::{CustomerRepository, OrderRepository, ProductRepository};

pub use customer_service::CustomerService;
pub use order_service::OrderService;
pub use product_service::ProductService;

pub type DynCustomerRepository = Arc<dyn CustomerRepository>;
pub type DynProductRepository = Arc<dyn ProductRepository>;
pub type DynOrderRepository = Arc<dyn OrderRepository>;

/// The services behind the API, wired to one set of repositories.
pub struct CrmServices {
    pub customers: CustomerService<DynCustomerRepository>,
    pub products: ProductService<DynProductRepository>,
    pub orders: OrderService<DynCustomerRepository, DynProductRepository, DynOrderRepository>,
}

impl CrmServices {
    pub fn new(
        customers: DynCustomerRepository,
        products: DynProductRepository,
        orders: DynOrderRepository,
    ) -> Self {
        Self {
            customers: CustomerService::new(customers.clone()),
            products: ProductService::new(products.clone()),
            orders: OrderService::new(customers, products, orders),
        }
    }

    /// Every port served by one store, e.g. [`InMemoryCrm`].
    ///
    /// [`InMemoryCrm`]: crate::infrastructure::memory::InMemoryCrm
    pub fn from_store<S>(store: S) -> Self
    where
        S: CustomerRepository + ProductRepository + OrderRepository + Clone,
    {
        Self::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
        )
    }
}
