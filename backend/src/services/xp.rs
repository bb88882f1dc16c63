use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::{
    error::CoreError,
    models::xp_event::XpGrant,
    repositories::{begin_transaction, commit_transaction, user, xp_event},
    types::UserId,
};

pub const XP_PER_LEVEL: i64 = 100;

/// `level = max(1, xp / 100 + 1)`.
pub fn level_for_xp(xp: i64) -> i32 {
    let level = xp.max(0) / XP_PER_LEVEL + 1;
    i32::try_from(level).unwrap_or(i32::MAX).max(1)
}

pub fn xp_into_level(xp: i64) -> i64 {
    xp.max(0) % XP_PER_LEVEL
}

pub fn xp_to_next_level(xp: i64) -> i64 {
    XP_PER_LEVEL - xp_into_level(xp)
}

/// Grants `points` to `user_id` in its own transaction.
pub async fn grant(
    pool: &PgPool,
    user_id: UserId,
    points: i32,
    reason: &str,
) -> Result<XpGrant, CoreError> {
    ensure_positive(points)?;
    let mut tx = begin_transaction(pool).await?;
    let granted = grant_in(&mut tx, user_id, points, reason, Utc::now()).await?;
    commit_transaction(tx).await?;
    Ok(granted)
}

/// Appends the ledger event and updates the cached xp/level under the user
/// row lock. The caller owns the commit.
pub async fn grant_in(
    conn: &mut PgConnection,
    user_id: UserId,
    points: i32,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<XpGrant, CoreError> {
    ensure_positive(points)?;

    let progress = user::lock_progress(conn, user_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("user {}", user_id)))?;

    xp_event::insert_xp_event(conn, user_id, points, reason, now).await?;

    let new_xp = progress.xp.saturating_add(i64::from(points));
    let new_level = level_for_xp(new_xp);
    user::update_xp(conn, user_id, new_xp, new_level, now).await?;

    let leveled_up = new_level > progress.level;
    if leveled_up {
        tracing::info!(%user_id, new_level, "user leveled up");
    }

    Ok(XpGrant {
        new_xp,
        new_level,
        leveled_up,
    })
}

fn ensure_positive(points: i32) -> Result<(), CoreError> {
    if points <= 0 {
        return Err(CoreError::InvalidArgument(format!(
            "xp grant must be positive, got {}",
            points
        )));
    }
    Ok(())
}
