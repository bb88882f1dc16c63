use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use super::common::push_clause;
use crate::models::{flashcard::Flashcard, progress::SubjectCount};
use crate::types::{FlashcardId, UserId};

const SELECT_COLUMNS: &str = "id, user_id, subject, notes, question, answer, difficulty, \
     times_reviewed, last_reviewed, created_at, updated_at";

pub async fn insert_flashcard(conn: &mut PgConnection, card: &Flashcard) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO flashcards (id, user_id, subject, notes, question, answer, difficulty, \
         times_reviewed, last_reviewed, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(card.id)
    .bind(card.user_id)
    .bind(&card.subject)
    .bind(&card.notes)
    .bind(&card.question)
    .bind(&card.answer)
    .bind(&card.difficulty)
    .bind(card.times_reviewed)
    .bind(card.last_reviewed)
    .bind(card.created_at)
    .bind(card.updated_at)
    .execute(conn)
    .await
    .map(|_| ())
}

fn push_owner_filters<'a>(
    builder: &mut QueryBuilder<'a, Postgres>,
    user_id: UserId,
    subject: Option<&'a str>,
) {
    let mut has_clause = false;
    push_clause(builder, &mut has_clause);
    builder.push("user_id = ").push_bind(user_id);
    if let Some(subject) = subject {
        push_clause(builder, &mut has_clause);
        builder.push("subject = ").push_bind(subject);
    }
}

pub async fn list_flashcards(
    pool: &PgPool,
    user_id: UserId,
    subject: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Flashcard>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM flashcards", SELECT_COLUMNS));
    push_owner_filters(&mut builder, user_id, subject);
    builder
        .push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    builder.build_query_as::<Flashcard>().fetch_all(pool).await
}

pub async fn count_flashcards(
    pool: &PgPool,
    user_id: UserId,
    subject: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM flashcards");
    push_owner_filters(&mut builder, user_id, subject);
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

/// Deletes the card if it belongs to `user_id`. Returns whether a row went away.
pub async fn delete_flashcard(
    pool: &PgPool,
    id: FlashcardId,
    user_id: UserId,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM flashcards WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn mark_reviewed(
    conn: &mut PgConnection,
    id: FlashcardId,
    user_id: UserId,
    now: DateTime<Utc>,
) -> Result<Option<Flashcard>, sqlx::Error> {
    let query = format!(
        "UPDATE flashcards SET times_reviewed = times_reviewed + 1, last_reviewed = $1, updated_at = $1 \
         WHERE id = $2 AND user_id = $3 RETURNING {}",
        SELECT_COLUMNS
    );
    sqlx::query_as::<_, Flashcard>(&query)
        .bind(now)
        .bind(id)
        .bind(user_id)
        .fetch_optional(conn)
        .await
}

pub async fn subject_counts(pool: &PgPool, user_id: UserId) -> Result<Vec<SubjectCount>, sqlx::Error> {
    sqlx::query_as::<_, SubjectCount>(
        "SELECT subject, COUNT(*) AS count FROM flashcards WHERE user_id = $1 \
         GROUP BY subject ORDER BY count DESC, subject ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn count_reviewed_between(
    pool: &PgPool,
    user_id: UserId,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM flashcards \
         WHERE user_id = $1 AND last_reviewed >= $2 AND last_reviewed < $3",
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await
}

pub async fn most_reviewed_subject(
    pool: &PgPool,
    user_id: UserId,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT subject FROM flashcards WHERE user_id = $1 \
         GROUP BY subject HAVING SUM(times_reviewed) > 0 \
         ORDER BY SUM(times_reviewed) DESC, subject ASC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
