use crate::domain::errors::DomainError;
use crate::domain::filters::ProductFilter;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{
    NewProduct, Product, ProductInput, RestockResult, LOW_STOCK_THRESHOLD, RESTOCK_INCREMENT,
};

pub struct ProductService<R> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_product(&self, input: ProductInput) -> Result<Product, DomainError> {
        let product = self.repo.insert(NewProduct::try_from(&input)?)?;
        log::info!("Created product {} ({})", product.id, product.name);
        Ok(product)
    }

    pub fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        self.repo.list(filter)
    }

    /// Tops up every product below the low-stock threshold. Not idempotent:
    /// each run adds another increment to whatever is still below the line.
    pub fn update_low_stock_products(&self) -> Result<RestockResult, DomainError> {
        let products = self
            .repo
            .restock_below(LOW_STOCK_THRESHOLD, RESTOCK_INCREMENT)?;
        for p in &products {
            log::info!("Restocked {} to {}", p.name, p.stock);
        }
        Ok(RestockResult::new(products))
    }
}
