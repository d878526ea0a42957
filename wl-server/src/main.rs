mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use crate::application::post_service::PostService;
use crate::application::simulation_service::SimulationService;
use crate::data::post_repository::SqlitePostRepository;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use presentation::server::start_rest_server;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_logging(config.environment)?;
    let pool = create_pool(&config.database_path, config.database_read_only).await?;
    if !config.database_read_only {
        run_migrations(&pool).await?;
    } else {
        info!("database opened read-only, skipping migrations");
    }

    let post_repo = Arc::new(SqlitePostRepository::new(pool.clone()));
    let post_service = PostService::new(Arc::clone(&post_repo), config.posts_per_page);
    let simulation_service = SimulationService::new(config.simulation.clone());

    start_rest_server(config, post_service, simulation_service).await
}
