use sqlx::PgConnection;

use crate::models::study_session::StudySession;

pub async fn insert_study_session(
    conn: &mut PgConnection,
    session: &StudySession,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO study_sessions (id, user_id, subject, flashcards_studied, duration_minutes, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(session.id)
    .bind(session.user_id)
    .bind(&session.subject)
    .bind(session.flashcards_studied)
    .bind(session.duration_minutes)
    .bind(session.created_at)
    .execute(conn)
    .await
    .map(|_| ())
}
