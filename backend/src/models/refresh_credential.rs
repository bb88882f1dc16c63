//! Server-side record backing each long-lived refresh token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::UserId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// One row per issued refresh token, keyed by the token's `jti`.
///
/// Lifecycle: active, then either revoked (flag set) or expired (implicit,
/// by comparing `expires_at`). Rows are never otherwise updated.
pub struct RefreshCredential {
    pub jti: String,
    pub user_id: UserId,
    pub revoked: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshCredential {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRefreshCredential {
    pub jti: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}
