pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod graphql;
pub mod handlers;
pub mod infrastructure;
pub mod jobs;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};

pub use application::CrmServices;
pub use db::{create_pool, run_migrations, DbPool, MIGRATIONS};
pub use graphql::{build_schema, CrmSchema};

/// Route table. Expects `web::Data<CrmServices>` and `web::Data<CrmSchema>`
/// to be registered on the app.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health::health))
        .route("/api-docs/openapi.json", web::get().to(handlers::openapi_json))
        .service(
            web::resource("/graphql")
                .route(web::post().to(handlers::graphql::graphql))
                .route(web::get().to(handlers::graphql::graphiql)),
        )
        .service(
            web::scope("/api")
                .route("/summary", web::get().to(handlers::orders::summary))
                .route("/orders/{id}", web::get().to(handlers::orders::get_order)),
        );
}

/// Services backed by the Diesel repositories.
pub fn diesel_services(pool: DbPool) -> CrmServices {
    CrmServices::new(
        Arc::new(infrastructure::DieselCustomerRepository::new(pool.clone())),
        Arc::new(infrastructure::DieselProductRepository::new(pool.clone())),
        Arc::new(infrastructure::DieselOrderRepository::new(pool)),
    )
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    services: Arc<CrmServices>,
    schema: CrmSchema,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let services = web::Data::from(services);
    let schema = web::Data::new(schema);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(services.clone())
            .app_data(schema.clone())
            .wrap(Logger::default())
            .configure(routes)
    })
    .bind((host.to_string(), port))?
    .run())
}
