use std::time::Duration;

use configs::StoreConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::errors::ModelError;

/// Open a pooled Postgres connection from the store section of the config.
pub async fn connect(cfg: &StoreConfig) -> Result<DatabaseConnection, ModelError> {
    let mut opts = ConnectOptions::new(cfg.database_url.clone());
    opts.max_connections(cfg.max_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opts).await?;
    info!(max_connections = cfg.max_connections, "connected to post database");
    Ok(db)
}

/// Connect using `DATABASE_URL` only; used by tests that need a live database.
pub async fn connect_from_env() -> anyhow::Result<DatabaseConnection> {
    let url = std::env::var("DATABASE_URL")?;
    let cfg = StoreConfig {
        database_url: url,
        max_connections: 5,
        connect_timeout_secs: 10,
        ..StoreConfig::default()
    };
    Ok(connect(&cfg).await?)
}
