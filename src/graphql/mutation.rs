use async_graphql::{Context, Object, Result, ID};

use crate::domain::customer::CustomerInput;
use crate::domain::order::OrderInput;
use crate::domain::product::ProductInput;

use super::schema::run_blocking;
use super::types::{
    BulkCreateCustomersPayload, CreateCustomerPayload, CreateOrderPayload, CreateProductPayload,
    CustomerInputObject, Decimal, UpdateLowStockProductsPayload,
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_customer(
        &self,
        ctx: &Context<'_>,
        name: String,
        email: String,
        phone: Option<String>,
    ) -> Result<CreateCustomerPayload> {
        let input = CustomerInput { name, email, phone };
        let created = run_blocking(ctx, move |s| s.customers.create_customer(input)).await?;
        Ok(created.into())
    }

    /// Creates each valid customer; invalid or duplicate records are reported
    /// in `errors` without aborting the rest.
    async fn bulk_create_customers(
        &self,
        ctx: &Context<'_>,
        input: Vec<CustomerInputObject>,
    ) -> Result<BulkCreateCustomersPayload> {
        let inputs: Vec<CustomerInput> = input.into_iter().map(Into::into).collect();
        let result = run_blocking(ctx, move |s| s.customers.bulk_create_customers(inputs)).await?;
        Ok(result.into())
    }

    async fn create_product(
        &self,
        ctx: &Context<'_>,
        name: String,
        price: Decimal,
        #[graphql(default = 0)] stock: i32,
    ) -> Result<CreateProductPayload> {
        let input = ProductInput {
            name,
            price: price.0,
            stock,
        };
        let product = run_blocking(ctx, move |s| s.products.create_product(input)).await?;
        Ok(CreateProductPayload {
            product: product.into(),
        })
    }

    async fn create_order(
        &self,
        ctx: &Context<'_>,
        customer_id: ID,
        product_ids: Vec<ID>,
        #[graphql(desc = "ISO-8601 timestamp or date; defaults to now")]
        order_date: Option<String>,
    ) -> Result<CreateOrderPayload> {
        let input = OrderInput {
            customer_id: customer_id.0,
            product_ids: product_ids.into_iter().map(|id| id.0).collect(),
            order_date,
        };
        let order = run_blocking(ctx, move |s| s.orders.create_order(input)).await?;
        Ok(CreateOrderPayload {
            order: order.into(),
        })
    }

    /// Adds 10 units to every product with stock below 10.
    async fn update_low_stock_products(
        &self,
        ctx: &Context<'_>,
    ) -> Result<UpdateLowStockProductsPayload> {
        let result = run_blocking(ctx, |s| s.products.update_low_stock_products()).await?;
        Ok(result.into())
    }
}
