//! Transaction helpers shared by the core services.
//!
//! A transaction that is dropped without [`commit_transaction`] rolls back,
//! so every early return leaves no partial state behind.

use sqlx::postgres::PgTransaction;
use sqlx::PgPool;

use crate::error::CoreError;

pub async fn begin_transaction(db: &PgPool) -> Result<PgTransaction<'static>, CoreError> {
    db.begin().await.map_err(CoreError::StoreUnavailable)
}

pub async fn commit_transaction(tx: PgTransaction<'_>) -> Result<(), CoreError> {
    tx.commit().await.map_err(CoreError::StoreUnavailable)
}
