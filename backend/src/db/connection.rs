use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::Config;

pub type DbPool = PgPool;

/// Opens the process-wide pool. Close it with [`close_pool`] on shutdown.
pub async fn create_pool(config: &Config) -> anyhow::Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(config.database_acquire_timeout_seconds))
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}

pub async fn close_pool(pool: &DbPool) {
    pool.close().await;
    tracing::info!("Database pool closed");
}

/// Round-trips a trivial query to confirm the store is reachable.
pub async fn ping(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
