use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::models::user::User;
use crate::types::UserId;

const USER_COLUMNS: &str = "id, username, email, password_hash, xp, level, current_streak, \
     best_streak, last_activity, last_streak_date, created_at, updated_at";

/// Gamification columns of a user row, read under a row lock.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct LockedProgress {
    pub xp: i64,
    pub level: i32,
    pub current_streak: i32,
    pub best_streak: i32,
    pub last_streak_date: Option<NaiveDate>,
}

pub async fn insert_user(pool: &PgPool, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, xp, level, current_streak, \
         best_streak, last_activity, last_streak_date, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.xp)
    .bind(user.level)
    .bind(user.current_streak)
    .bind(user.best_streak)
    .bind(user.last_activity)
    .bind(user.last_streak_date)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(pool)
    .await
    .map(|_| ())
}

/// Finds a user whose username or (case-insensitive) email matches `login`.
pub async fn find_user_by_login(pool: &PgPool, login: &str) -> Result<Option<User>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM users WHERE username = $1 OR email = LOWER($1) LIMIT 1",
        USER_COLUMNS
    );
    sqlx::query_as::<_, User>(&query)
        .bind(login)
        .fetch_optional(pool)
        .await
}

pub async fn find_user_by_id(pool: &PgPool, user_id: UserId) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    sqlx::query_as::<_, User>(&query)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Locks the user row for the rest of the transaction. This is the
/// per-user serialization point for streak and XP updates.
///
/// `FOR NO KEY UPDATE` still serializes writers but stays compatible with
/// the `FOR KEY SHARE` lock a foreign-key check on a child insert takes, so
/// a handler may insert a flashcard or session row before locking.
pub async fn lock_progress(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<Option<LockedProgress>, sqlx::Error> {
    sqlx::query_as::<_, LockedProgress>(
        "SELECT xp, level, current_streak, best_streak, last_streak_date FROM users \
         WHERE id = $1 FOR NO KEY UPDATE",
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await
}

/// Stores the streak as of `last_streak_date`, which must be the newest
/// study date on record.
pub async fn update_streak(
    conn: &mut PgConnection,
    user_id: UserId,
    current_streak: i32,
    best_streak: i32,
    last_streak_date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET current_streak = $1, best_streak = $2, \
         last_streak_date = $3, \
         last_activity = $4, updated_at = $4 \
         WHERE id = $5",
    )
    .bind(current_streak)
    .bind(best_streak)
    .bind(last_streak_date)
    .bind(now)
    .bind(user_id)
    .execute(conn)
    .await
    .map(|_| ())
}

pub async fn update_xp(
    conn: &mut PgConnection,
    user_id: UserId,
    xp: i64,
    level: i32,
    now: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET xp = $1, level = $2, updated_at = $3 WHERE id = $4")
        .bind(xp)
        .bind(level)
        .bind(now)
        .bind(user_id)
        .execute(conn)
        .await
        .map(|_| ())
}

/// Name of the unique constraint a failed insert tripped over, if any.
pub fn violated_unique_constraint(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            db_err.constraint().map(str::to_string)
        }
        _ => None,
    }
}
