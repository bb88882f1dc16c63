use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::models::xp_event::XpEvent;
use crate::types::UserId;

pub async fn insert_xp_event(
    conn: &mut PgConnection,
    user_id: UserId,
    points: i32,
    reason: &str,
    created_at: DateTime<Utc>,
) -> Result<XpEvent, sqlx::Error> {
    sqlx::query_as::<_, XpEvent>(
        "INSERT INTO xp_events (user_id, points, reason, created_at) VALUES ($1, $2, $3, $4) \
         RETURNING id, user_id, points, reason, created_at",
    )
    .bind(user_id)
    .bind(points)
    .bind(reason)
    .bind(created_at)
    .fetch_one(conn)
    .await
}

pub async fn list_recent_xp_events(
    pool: &PgPool,
    user_id: UserId,
    limit: i64,
) -> Result<Vec<XpEvent>, sqlx::Error> {
    sqlx::query_as::<_, XpEvent>(
        "SELECT id, user_id, points, reason, created_at FROM xp_events \
         WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}
