use config::Config;
use log::info;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tokio::time::Duration;

pub mod config;
pub mod logging;

pub async fn init_database(config: &Config) -> Result<DatabaseConnection, DbErr> {
    info!(
        "Database pool config: max_connections={}, min_connections={}, \
         connect_timeout={}s, acquire_timeout={}s, idle_timeout={}s, max_lifetime={}s, schema={}",
        config.db_max_connections,
        config.db_min_connections,
        config.db_connect_timeout_secs,
        config.db_acquire_timeout_secs,
        config.db_idle_timeout_secs,
        config.db_max_lifetime_secs,
        config.database_schema(),
    );

    let mut opt = ConnectOptions::new::<&str>(config.database_url());
    opt.max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .connect_timeout(Duration::from_secs(config.db_connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime_secs))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug)
        .set_schema_search_path(config.database_schema());

    let db = Database::connect(opt).await?;

    Ok(db)
}

/// Creates the configured schema when it does not exist yet. Must run before
/// migrations, which create their tables inside the connection's search path.
pub async fn ensure_schema(db: &DatabaseConnection, schema: &str) -> Result<(), DbErr> {
    if !is_valid_schema_name(schema) {
        return Err(DbErr::Custom(format!("Invalid schema name: {schema}")));
    }

    info!("Ensuring database schema [{schema}] exists");
    db.execute_unprepared(&format!("CREATE SCHEMA IF NOT EXISTS \"{schema}\";"))
        .await?;

    Ok(())
}

// Schema names are interpolated into DDL, so only plain identifiers are accepted.
fn is_valid_schema_name(schema: &str) -> bool {
    let mut chars = schema.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
