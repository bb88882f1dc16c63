//! Credential Store: durable, revocable records behind refresh tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::refresh_credential::{NewRefreshCredential, RefreshCredential};

/// Storage seam for refresh credentials.
///
/// Mocked with `MockCredentialStore` in unit tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persists a freshly issued credential. Fails if the `jti` already exists.
    async fn insert(&self, credential: &NewRefreshCredential) -> Result<(), sqlx::Error>;

    async fn find_by_jti(&self, jti: &str) -> Result<Option<RefreshCredential>, sqlx::Error>;

    /// Flags the credential revoked. Returns `true` only when this call
    /// flipped the flag; unknown or already revoked `jti`s return `false`.
    async fn revoke(&self, jti: &str) -> Result<bool, sqlx::Error>;

    /// Deletes credentials that are revoked or expired as of `now`.
    async fn purge_inactive(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn insert(&self, credential: &NewRefreshCredential) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO refresh_credentials (jti, user_id, revoked, expires_at, created_at) \
             VALUES ($1, $2, FALSE, $3, NOW())",
        )
        .bind(&credential.jti)
        .bind(credential.user_id)
        .bind(credential.expires_at)
        .execute(&self.pool)
        .await
        .map(|_| ())
    }

    async fn find_by_jti(&self, jti: &str) -> Result<Option<RefreshCredential>, sqlx::Error> {
        sqlx::query_as::<_, RefreshCredential>(
            "SELECT jti, user_id, revoked, expires_at, created_at \
             FROM refresh_credentials WHERE jti = $1",
        )
        .bind(jti)
        .fetch_optional(&self.pool)
        .await
    }

    async fn revoke(&self, jti: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_credentials SET revoked = TRUE WHERE jti = $1 AND revoked = FALSE",
        )
        .bind(jti)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn purge_inactive(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM refresh_credentials WHERE revoked = TRUE OR expires_at <= $1")
                .bind(now)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}
