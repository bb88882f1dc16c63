use axum::{
    extract::{Extension, Query, State},
    Json,
};

use crate::{
    error::AppError,
    middleware::AuthUser,
    models::{
        progress::{ProgressResponse, StatsResponse},
        user::User,
        xp_event::{XpEvent, XpEventQuery},
    },
    repositories::{flashcard as flashcard_repo, user as user_repo, xp_event as xp_repo},
    services::{streak, xp},
    state::AppState,
    types::UserId,
    utils::time::{day_bounds_utc, today_local},
};

const DEFAULT_EVENT_LIMIT: i64 = 20;
const MAX_EVENT_LIMIT: i64 = 100;

async fn load_user(state: &AppState, user_id: UserId) -> Result<User, AppError> {
    user_repo::find_user_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

pub async fn my_progress(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ProgressResponse>, AppError> {
    let user = load_user(&state, auth.user_id).await?;
    let today = today_local(&state.config.time_zone);
    Ok(Json(ProgressResponse {
        xp: user.xp,
        level: user.level,
        xp_into_level: xp::xp_into_level(user.xp),
        xp_to_next_level: xp::xp_to_next_level(user.xp),
        current_streak: streak::visible_streak(user.current_streak, user.last_streak_date, today),
        best_streak: user.best_streak,
        last_streak_date: user.last_streak_date,
    }))
}

pub async fn my_xp_events(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<XpEventQuery>,
) -> Result<Json<Vec<XpEvent>>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_EVENT_LIMIT)
        .clamp(1, MAX_EVENT_LIMIT);
    let events = xp_repo::list_recent_xp_events(&state.pool, auth.user_id, limit).await?;
    Ok(Json(events))
}

pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<StatsResponse>, AppError> {
    let user = load_user(&state, auth.user_id).await?;
    let by_subject = flashcard_repo::subject_counts(&state.pool, auth.user_id).await?;
    let total_flashcards: i64 = by_subject.iter().map(|entry| entry.count).sum();

    let today = today_local(&state.config.time_zone);
    let (start, end) = day_bounds_utc(today, &state.config.time_zone);
    let reviewed_today =
        flashcard_repo::count_reviewed_between(&state.pool, auth.user_id, start, end).await?;
    let most_reviewed_subject =
        flashcard_repo::most_reviewed_subject(&state.pool, auth.user_id).await?;

    Ok(Json(StatsResponse {
        total_flashcards,
        reviewed_today,
        streak_days: streak::visible_streak(user.current_streak, user.last_streak_date, today),
        best_streak: user.best_streak,
        xp: user.xp,
        level: user.level,
        most_reviewed_subject,
        by_subject,
    }))
}
