//! Deletes refresh credentials that are revoked or past their expiry.
//! Meant to run periodically (cron, scheduled job).

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studybuddy_backend::{
    config::Config,
    db::connection::{close_pool, create_pool},
    repositories::{CredentialStore, PgCredentialStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "token_cleanup=info,studybuddy_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let pool = create_pool(&config).await?;

    let store = PgCredentialStore::new(pool.clone());
    let deleted = store.purge_inactive(Utc::now()).await?;
    tracing::info!(deleted, "Purged inactive refresh credentials");

    sqlx::query("VACUUM (ANALYZE) refresh_credentials")
        .execute(&pool)
        .await?;

    close_pool(&pool).await;
    Ok(())
}
