use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::filters::ProductFilter;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{NewProduct, Product};
use crate::schema::products;

use super::contains_pattern;
use super::models::{NewProductRow, ProductRow};

pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for DieselProductRepository {
    fn insert(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;
        let row: ProductRow = diesel::insert_into(products::table)
            .values(&NewProductRow {
                id: Uuid::new_v4(),
                name: &product.name,
                price: &product.price,
                stock: product.stock,
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows: Vec<ProductRow> = products::table
            .filter(products::id.eq_any(ids))
            .select(ProductRow::as_select())
            .order(products::created_at.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = products::table
            .select(ProductRow::as_select())
            .into_boxed();
        if let Some(name) = &filter.name_icontains {
            query = query.filter(products::name.ilike(contains_pattern(name)));
        }
        if let Some(min) = &filter.price_gte {
            query = query.filter(products::price.ge(min.clone()));
        }
        if let Some(max) = &filter.price_lte {
            query = query.filter(products::price.le(max.clone()));
        }
        if let Some(min) = filter.stock_gte {
            query = query.filter(products::stock.ge(min));
        }
        if let Some(max) = filter.stock_lte {
            query = query.filter(products::stock.le(max));
        }

        let rows: Vec<ProductRow> = query
            .order((products::created_at.asc(), products::id.asc()))
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// One conditional UPDATE: each matching row is locked while it is
    /// incremented and the `stock < threshold` predicate is re-checked
    /// against the latest committed value, so overlapping runs cannot both
    /// top up the same product.
    fn restock_below(&self, threshold: i32, increment: i32) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let low_stock = products::table.filter(products::stock.lt(threshold));
        let mut rows: Vec<ProductRow> = diesel::update(low_stock)
            .set(products::stock.eq(products::stock + increment))
            .returning(ProductRow::as_returning())
            .get_results(&mut conn)?;
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
