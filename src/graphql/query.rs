use async_graphql::{Context, Object, Result, ID};

use crate::domain::filters::{CustomerFilter, OrderFilter, ProductFilter};
use crate::domain::validation::parse_id;

use super::schema::run_blocking;
use super::types::{
    CustomerFilterInput, CustomerObject, Decimal, OrderFilterInput, OrderObject,
    ProductFilterInput, ProductObject,
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Liveness check used by the heartbeat job.
    async fn hello(&self) -> &'static str {
        "Hi!"
    }

    async fn customers(
        &self,
        ctx: &Context<'_>,
        filter: Option<CustomerFilterInput>,
    ) -> Result<Vec<CustomerObject>> {
        let filter: CustomerFilter = filter.unwrap_or_default().into();
        let customers = run_blocking(ctx, move |s| s.customers.list_customers(&filter)).await?;
        Ok(customers.into_iter().map(Into::into).collect())
    }

    async fn customer(&self, ctx: &Context<'_>, id: ID) -> Result<Option<CustomerObject>> {
        let Some(id) = parse_id(&id) else {
            return Ok(None);
        };
        let customer = run_blocking(ctx, move |s| s.customers.get_customer(id)).await?;
        Ok(customer.map(Into::into))
    }

    async fn products(
        &self,
        ctx: &Context<'_>,
        filter: Option<ProductFilterInput>,
    ) -> Result<Vec<ProductObject>> {
        let products = run_blocking(ctx, move |s| {
            let filter = ProductFilter::try_from(filter.unwrap_or_default())?;
            s.products.list_products(&filter)
        })
        .await?;
        Ok(products.into_iter().map(Into::into).collect())
    }

    async fn orders(
        &self,
        ctx: &Context<'_>,
        filter: Option<OrderFilterInput>,
    ) -> Result<Vec<OrderObject>> {
        let orders = run_blocking(ctx, move |s| {
            let filter = OrderFilter::try_from(filter.unwrap_or_default())?;
            s.orders.list_orders(&filter)
        })
        .await?;
        Ok(orders.into_iter().map(Into::into).collect())
    }

    async fn order(&self, ctx: &Context<'_>, id: ID) -> Result<Option<OrderObject>> {
        let Some(id) = parse_id(&id) else {
            return Ok(None);
        };
        let order = run_blocking(ctx, move |s| s.orders.get_order(id)).await?;
        Ok(order.map(Into::into))
    }

    async fn customers_count(&self, ctx: &Context<'_>) -> Result<i64> {
        run_blocking(ctx, |s| s.customers.count_customers()).await
    }

    async fn orders_count(&self, ctx: &Context<'_>) -> Result<i64> {
        run_blocking(ctx, |s| s.orders.count_orders()).await
    }

    /// Sum of every order's total; "0.00" when there are no orders.
    async fn total_revenue(&self, ctx: &Context<'_>) -> Result<Decimal> {
        let revenue = run_blocking(ctx, |s| s.orders.total_revenue()).await?;
        Ok(Decimal::from(&revenue))
    }
}
