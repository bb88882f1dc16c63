use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::UserId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Append-only audit entry for every experience grant.
pub struct XpEvent {
    pub id: i64,
    pub user_id: UserId,
    pub points: i32,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpGrant {
    pub new_xp: i64,
    pub new_level: i32,
    pub leveled_up: bool,
}

#[derive(Debug, Deserialize)]
pub struct XpEventQuery {
    pub limit: Option<i64>,
}
