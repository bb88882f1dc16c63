use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};

use crate::models::streak::StreakRecord;
use crate::types::UserId;

/// Inserts the `(user, date)` record with count 1, or increments it in place.
/// Relies on the `(user_id, study_date)` primary key, so concurrent callers
/// never create a second row or lose an increment.
pub async fn upsert_study_day(
    conn: &mut PgConnection,
    user_id: UserId,
    study_date: NaiveDate,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO streak_records (user_id, study_date, count) VALUES ($1, $2, 1) \
         ON CONFLICT (user_id, study_date) \
         DO UPDATE SET count = streak_records.count + 1 \
         RETURNING count",
    )
    .bind(user_id)
    .bind(study_date)
    .fetch_one(conn)
    .await
}

/// Study dates on or before `as_of`, newest first.
pub async fn study_dates_desc(
    conn: &mut PgConnection,
    user_id: UserId,
    as_of: NaiveDate,
) -> Result<Vec<NaiveDate>, sqlx::Error> {
    sqlx::query_scalar::<_, NaiveDate>(
        "SELECT study_date FROM streak_records \
         WHERE user_id = $1 AND study_date <= $2 \
         ORDER BY study_date DESC",
    )
    .bind(user_id)
    .bind(as_of)
    .fetch_all(conn)
    .await
}

pub async fn list_streak_records(
    pool: &PgPool,
    user_id: UserId,
) -> Result<Vec<StreakRecord>, sqlx::Error> {
    sqlx::query_as::<_, StreakRecord>(
        "SELECT user_id, study_date, count FROM streak_records \
         WHERE user_id = $1 ORDER BY study_date DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
