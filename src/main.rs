use domain::DatabaseEventStore;
use log::{error, info, warn};
use migration::{Migrator, MigratorTrait};
use service::{config::Config, logging::Logger};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!(
        "Starting git_activity_feed in the {} environment",
        config.runtime_env()
    );

    if !config.is_signature_verification_enabled() {
        warn!("WEBHOOK_SECRET is not set: webhook signatures will NOT be verified");
    }

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = service::ensure_schema(&db, config.database_schema()).await {
        error!("Failed to prepare database schema: {e}");
        std::process::exit(1);
    }

    if let Err(e) = Migrator::up(db.as_ref(), None).await {
        error!("Failed to run database migrations: {e}");
        std::process::exit(1);
    }

    let app_state = web::AppState::new(config, Arc::new(DatabaseEventStore::new(db)));

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}
