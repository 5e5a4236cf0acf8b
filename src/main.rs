use std::io;
use std::sync::Arc;

use crm_service::config::AppConfig;
use crm_service::jobs::Scheduler;
use crm_service::{build_schema, build_server, create_pool, diesel_services, run_migrations};
use dotenvy::dotenv;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(io::Error::other)?;

    let pool = create_pool(&config.database_url).map_err(io::Error::other)?;
    run_migrations(&pool).map_err(io::Error::other)?;

    let services = Arc::new(diesel_services(pool));
    let schema = build_schema(services.clone());

    let scheduler = if config.jobs.enabled {
        Some(Scheduler::start(schema.clone(), &config.jobs).map_err(io::Error::other)?)
    } else {
        log::info!("Background jobs disabled");
        None
    };

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    let result = build_server(services, schema, &config.host, config.port)?.await;

    if let Some(scheduler) = scheduler {
        scheduler.shutdown().await;
    }
    result
}
