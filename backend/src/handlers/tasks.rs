use axum::extract::{Extension, State};
use axum::Json;
use chrono::Utc;

use crate::{
    error::AppError,
    middleware::AuthUser,
    models::progress::ActivityOutcome,
    repositories::{begin_transaction, commit_transaction},
    services::activity::{self, ActivityKind},
    state::AppState,
    utils::time::today_local,
};

pub async fn complete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ActivityOutcome>, AppError> {
    let mut tx = begin_transaction(&state.pool).await?;
    let outcome = activity::record(
        &mut tx,
        auth.user_id,
        ActivityKind::TaskCompleted,
        today_local(&state.config.time_zone),
        Utc::now(),
    )
    .await?;
    commit_transaction(tx).await?;
    Ok(Json(outcome))
}
