use std::collections::HashMap;

use bigdecimal::BigDecimal;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::customer::Customer;
use crate::domain::errors::DomainError;
use crate::domain::filters::OrderFilter;
use crate::domain::order::{Order, OrderDraft};
use crate::domain::ports::OrderRepository;
use crate::domain::product::Product;
use crate::schema::{customers, order_products, orders, products};

use super::contains_pattern;
use super::models::{CustomerRow, NewOrderProductRow, NewOrderRow, OrderRow, ProductRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Attaches customers and products to order rows, preserving row order.
fn hydrate(conn: &mut PgConnection, rows: Vec<OrderRow>) -> Result<Vec<Order>, DomainError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let order_ids: Vec<Uuid> = rows.iter().map(|o| o.id).collect();
    let customer_ids: Vec<Uuid> = rows.iter().map(|o| o.customer_id).collect();

    let customer_rows: Vec<CustomerRow> = customers::table
        .filter(customers::id.eq_any(&customer_ids))
        .select(CustomerRow::as_select())
        .load(conn)?;
    let customers_by_id: HashMap<Uuid, Customer> = customer_rows
        .into_iter()
        .map(|c| (c.id, c.into()))
        .collect();

    let links: Vec<(Uuid, ProductRow)> = order_products::table
        .inner_join(products::table)
        .filter(order_products::order_id.eq_any(&order_ids))
        .select((order_products::order_id, ProductRow::as_select()))
        .order(products::created_at.asc())
        .load(conn)?;
    let mut products_by_order: HashMap<Uuid, Vec<Product>> = HashMap::new();
    for (order_id, product) in links {
        products_by_order
            .entry(order_id)
            .or_default()
            .push(product.into());
    }

    rows.into_iter()
        .map(|o| {
            let customer = customers_by_id.get(&o.customer_id).cloned().ok_or_else(|| {
                DomainError::Internal(format!("order {} has no customer", o.id))
            })?;
            Ok(Order {
                id: o.id,
                customer,
                products: products_by_order.remove(&o.id).unwrap_or_default(),
                total_amount: o.total_amount,
                order_date: o.order_date,
            })
        })
        .collect()
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, draft: OrderDraft) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the order with its precomputed total
            let row: OrderRow = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: Uuid::new_v4(),
                    customer_id: draft.customer_id(),
                    total_amount: draft.total_amount(),
                    order_date: draft.order_date(),
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)
                .map_err(|e| match e {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        DomainError::validation("Invalid customer ID")
                    }
                    other => other.into(),
                })?;

            // 2. Attach the product set
            let links: Vec<NewOrderProductRow> = draft
                .product_ids()
                .iter()
                .map(|&product_id| NewOrderProductRow {
                    order_id: row.id,
                    product_id,
                })
                .collect();
            diesel::insert_into(order_products::table)
                .values(&links)
                .execute(conn)
                .map_err(|e| match e {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        DomainError::validation("At least one valid product must be selected")
                    }
                    other => other.into(),
                })?;

            hydrate(conn, vec![row])?
                .pop()
                .ok_or_else(|| DomainError::Internal("created order vanished".to_string()))
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let row: Option<OrderRow> = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(hydrate(&mut conn, vec![row])?.pop())
    }

    fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = orders::table.select(OrderRow::as_select()).into_boxed();
        if let Some(min) = &filter.total_amount_gte {
            query = query.filter(orders::total_amount.ge(min.clone()));
        }
        if let Some(max) = &filter.total_amount_lte {
            query = query.filter(orders::total_amount.le(max.clone()));
        }
        if let Some(from) = filter.order_date_gte {
            query = query.filter(orders::order_date.ge(from));
        }
        if let Some(to) = filter.order_date_lte {
            query = query.filter(orders::order_date.le(to));
        }
        if let Some(name) = &filter.customer_name {
            query = query.filter(
                orders::customer_id.eq_any(
                    customers::table
                        .filter(customers::name.ilike(contains_pattern(name)))
                        .select(customers::id),
                ),
            );
        }
        if let Some(name) = &filter.product_name {
            query = query.filter(
                orders::id.eq_any(
                    order_products::table
                        .inner_join(products::table)
                        .filter(products::name.ilike(contains_pattern(name)))
                        .select(order_products::order_id),
                ),
            );
        }
        if let Some(product_id) = filter.product_id {
            query = query.filter(
                orders::id.eq_any(
                    order_products::table
                        .filter(order_products::product_id.eq(product_id))
                        .select(order_products::order_id),
                ),
            );
        }

        let rows: Vec<OrderRow> = query
            .order((orders::order_date.desc(), orders::id.asc()))
            .load(&mut conn)?;
        hydrate(&mut conn, rows)
    }

    fn count(&self) -> Result<i64, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(orders::table.count().get_result(&mut conn)?)
    }

    fn total_revenue(&self) -> Result<BigDecimal, DomainError> {
        let mut conn = self.pool.get()?;
        let sum: Option<BigDecimal> = orders::table
            .select(diesel::dsl::sum(orders::total_amount))
            .get_result(&mut conn)?;
        Ok(sum.unwrap_or_else(|| BigDecimal::from(0)).with_scale(2))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::{Duration, Utc};

    use super::DieselOrderRepository;
    use crate::db::DbPool;
    use crate::domain::customer::{Customer, NewCustomer};
    use crate::domain::filters::OrderFilter;
    use crate::domain::order::OrderDraft;
    use crate::domain::ports::{CustomerRepository, OrderRepository, ProductRepository};
    use crate::domain::product::{NewProduct, Product};
    use crate::infrastructure::test_support::setup_db;
    use crate::infrastructure::{DieselCustomerRepository, DieselProductRepository};

    fn seed(pool: &DbPool) -> (Customer, Product, Product) {
        let customers = DieselCustomerRepository::new(pool.clone());
        let products = DieselProductRepository::new(pool.clone());
        let alice = customers
            .insert(NewCustomer {
                name: "Alice".into(),
                email: "alice@example.com".into(),
                phone: None,
            })
            .expect("insert customer failed");
        let make = |name: &str, price: &str| {
            products
                .insert(NewProduct {
                    name: name.into(),
                    price: BigDecimal::from_str(price).expect("valid decimal"),
                    stock: 20,
                })
                .expect("insert product failed")
        };
        let pen = make("Pen", "10.00");
        let notebook = make("Notebook", "15.50");
        (alice, pen, notebook)
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn create_persists_total_and_links() {
        let (_container, pool) = setup_db().await;
        let (alice, pen, notebook) = seed(&pool);
        let repo = DieselOrderRepository::new(pool);

        let draft = OrderDraft::new(&alice, &[pen, notebook], Utc::now()).unwrap();
        let created = repo.create(draft).expect("create failed");

        let found = repo
            .find_by_id(created.id)
            .expect("find failed")
            .expect("order should exist");
        assert_eq!(found.total_amount.to_string(), "25.50");
        assert_eq!(found.products.len(), 2);
        assert_eq!(found.customer.email, "alice@example.com");
        assert_eq!(repo.total_revenue().unwrap().to_string(), "25.50");
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn find_by_id_returns_none_for_unknown_id() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool);

        let result = repo
            .find_by_id(uuid::Uuid::new_v4())
            .expect("find should not error");

        assert!(result.is_none());
        assert_eq!(repo.total_revenue().unwrap().to_string(), "0.00");
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn list_filters_on_related_rows_and_dates() {
        let (_container, pool) = setup_db().await;
        let (alice, pen, notebook) = seed(&pool);
        let repo = DieselOrderRepository::new(pool);

        let old = Utc::now() - Duration::days(30);
        repo.create(OrderDraft::new(&alice, &[pen.clone()], old).unwrap())
            .unwrap();
        repo.create(OrderDraft::new(&alice, &[notebook], Utc::now()).unwrap())
            .unwrap();

        let recent = repo
            .list(&OrderFilter::placed_since(Utc::now() - Duration::days(7)))
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].products[0].name, "Notebook");

        let with_pen = repo
            .list(&OrderFilter {
                product_id: Some(pen.id),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(with_pen.len(), 1);

        let by_name = repo
            .list(&OrderFilter {
                customer_name: Some("ali".into()),
                product_name: Some("NOTE".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_name.len(), 1);

        let all = repo.list(&OrderFilter::default()).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].order_date > all[1].order_date);
    }
}
