use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::CrmServices;
use crate::domain::order::{CrmSummary, Order};
use crate::errors::AppError;

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderProductResponse {
    pub id: Uuid,
    pub name: String,
    /// Decimal price as a string, e.g. "9.99"
    pub price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_email: String,
    pub total_amount: String,
    pub order_date: String,
    pub products: Vec<OrderProductResponse>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            customer_id: order.customer.id,
            customer_email: order.customer.email,
            total_amount: order.total_amount.with_scale(2).to_string(),
            order_date: order.order_date.to_rfc3339(),
            products: order
                .products
                .into_iter()
                .map(|p| OrderProductResponse {
                    id: p.id,
                    name: p.name,
                    price: p.price.with_scale(2).to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub customers_count: i64,
    pub orders_count: i64,
    pub total_revenue: String,
}

impl From<CrmSummary> for SummaryResponse {
    fn from(s: CrmSummary) -> Self {
        Self {
            customers_count: s.customers_count,
            orders_count: s.orders_count,
            total_revenue: s.total_revenue.with_scale(2).to_string(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/orders/{id}
///
/// Returns the order together with its customer and products.
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    services: web::Data<CrmServices>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || services.orders.get_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}

/// GET /api/summary
///
/// Customer count, order count and revenue, as used by the weekly report.
#[utoipa::path(
    get,
    path = "/api/summary",
    responses(
        (status = 200, description = "Current totals", body = SummaryResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn summary(services: web::Data<CrmServices>) -> Result<HttpResponse, AppError> {
    let summary = web::block(move || services.orders.summary())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(SummaryResponse::from(summary)))
}
