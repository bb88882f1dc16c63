//! Streak engine: per-day activity tallies and consecutive-day streaks.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};

use crate::{
    error::CoreError,
    models::streak::StreakUpdate,
    repositories::{begin_transaction, commit_transaction, streak, user},
    types::UserId,
};

/// Length of the run of consecutive days ending exactly at `as_of`.
///
/// `dates_desc` must be sorted newest first and free of duplicates. Dates
/// after `as_of` are ignored; if `as_of` itself is missing the streak is 0.
pub fn consecutive_days(dates_desc: &[NaiveDate], as_of: NaiveDate) -> i32 {
    let mut expected = Some(as_of);
    let mut streak = 0;
    for date in dates_desc.iter().skip_while(|date| **date > as_of) {
        match expected {
            Some(day) if *date == day => {
                streak += 1;
                expected = day.pred_opt();
            }
            _ => break,
        }
    }
    streak
}

/// Streak as seen on `today`: the cached value survives only while the last
/// study date is today or yesterday.
pub fn visible_streak(current_streak: i32, last_streak_date: Option<NaiveDate>, today: NaiveDate) -> i32 {
    match last_streak_date {
        Some(last) if last == today || Some(last) == today.pred_opt() => current_streak,
        _ => 0,
    }
}

/// Records one unit of activity for `user_id` on `at_date` in its own
/// transaction.
pub async fn record_activity(
    pool: &PgPool,
    user_id: UserId,
    at_date: NaiveDate,
) -> Result<StreakUpdate, CoreError> {
    let mut tx = begin_transaction(pool).await?;
    let update = record_activity_in(&mut tx, user_id, at_date, Utc::now()).await?;
    commit_transaction(tx).await?;
    Ok(update)
}

/// Transactional core of [`record_activity`]. The user row lock serializes
/// concurrent recordings for the same user; the caller owns the commit.
pub async fn record_activity_in(
    conn: &mut PgConnection,
    user_id: UserId,
    at_date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<StreakUpdate, CoreError> {
    let progress = user::lock_progress(conn, user_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("user {}", user_id)))?;

    let day_count = streak::upsert_study_day(conn, user_id, at_date).await?;

    // A back-dated recording can only change the run ending at the newest day.
    let anchor = progress
        .last_streak_date
        .map_or(at_date, |last| last.max(at_date));
    let dates = streak::study_dates_desc(conn, user_id, anchor).await?;

    let current_streak = consecutive_days(&dates, anchor);
    let best_streak = progress.best_streak.max(current_streak);
    user::update_streak(conn, user_id, current_streak, best_streak, anchor, now).await?;

    if current_streak > progress.best_streak {
        tracing::debug!(%user_id, current_streak, "new best streak");
    }

    Ok(StreakUpdate {
        current_streak,
        best_streak,
        day_count,
    })
}
