pub mod graphql;
pub mod health;
pub mod orders;

use actix_web::HttpResponse;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "CRM service", description = "Customers, products and orders"),
    paths(health::health, orders::get_order, orders::summary),
    components(schemas(
        health::HealthResponse,
        orders::OrderResponse,
        orders::OrderProductResponse,
        orders::SummaryResponse
    )),
    tags((name = "orders", description = "Read-only order endpoints"))
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
