use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    middleware::AuthUser,
    models::study_session::{LogStudySessionRequest, StudySession, StudySessionResponse},
    repositories::{begin_transaction, commit_transaction, study_session as session_repo},
    services::activity::{self, ActivityKind},
    state::AppState,
    utils::time::today_local,
};

pub async fn log_study_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<LogStudySessionRequest>,
) -> Result<(StatusCode, Json<StudySessionResponse>), AppError> {
    payload.validate()?;
    let session = StudySession::from_request(auth.user_id, &payload);

    let mut tx = begin_transaction(&state.pool).await?;
    session_repo::insert_study_session(&mut tx, &session).await?;
    let progress = activity::record(
        &mut tx,
        auth.user_id,
        ActivityKind::StudySessionLogged,
        today_local(&state.config.time_zone),
        Utc::now(),
    )
    .await?;
    commit_transaction(tx).await?;

    Ok((
        StatusCode::CREATED,
        Json(StudySessionResponse { session, progress }),
    ))
}
