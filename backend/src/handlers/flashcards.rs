use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    middleware::AuthUser,
    models::flashcard::{
        Flashcard, FlashcardListQuery, FlashcardListResponse, ReviewResponse,
        SaveFlashcardsRequest, SaveFlashcardsResponse,
    },
    repositories::{begin_transaction, commit_transaction, flashcard as flashcard_repo},
    services::activity::{self, ActivityKind},
    state::AppState,
    types::FlashcardId,
    utils::time::today_local,
};

/// Saves a batch of cards and records one `CardsCreated` activity for it.
pub async fn save_flashcards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<SaveFlashcardsRequest>,
) -> Result<(StatusCode, Json<SaveFlashcardsResponse>), AppError> {
    payload.validate()?;

    let notes = payload.notes.as_deref().unwrap_or_default();
    let cards: Vec<Flashcard> = payload
        .flashcards
        .iter()
        .map(|card| Flashcard::new(auth.user_id, &payload.subject, notes, card))
        .collect();
    let count = cards.len();

    let now = Utc::now();
    let mut tx = begin_transaction(&state.pool).await?;
    for card in &cards {
        flashcard_repo::insert_flashcard(&mut tx, card).await?;
    }
    let progress = activity::record(
        &mut tx,
        auth.user_id,
        ActivityKind::CardsCreated {
            count: u32::try_from(count).unwrap_or(u32::MAX),
        },
        today_local(&state.config.time_zone),
        now,
    )
    .await?;
    commit_transaction(tx).await?;

    tracing::info!(user_id = %auth.user_id, count, "flashcards saved");
    Ok((
        StatusCode::CREATED,
        Json(SaveFlashcardsResponse {
            message: format!("Saved {} flashcards", count),
            count,
            progress,
        }),
    ))
}

pub async fn list_flashcards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<FlashcardListQuery>,
) -> Result<Json<FlashcardListResponse>, AppError> {
    let subject = query.subject_filter();
    let (limit, offset) = (query.limit(), query.offset());

    let flashcards =
        flashcard_repo::list_flashcards(&state.pool, auth.user_id, subject, limit, offset).await?;
    let total = flashcard_repo::count_flashcards(&state.pool, auth.user_id, subject).await?;

    Ok(Json(FlashcardListResponse {
        flashcards,
        total,
        limit,
        offset,
    }))
}

pub async fn delete_flashcard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<FlashcardId>,
) -> Result<StatusCode, AppError> {
    if !flashcard_repo::delete_flashcard(&state.pool, id, auth.user_id).await? {
        return Err(AppError::NotFound("Flashcard not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn review_flashcard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<FlashcardId>,
) -> Result<Json<ReviewResponse>, AppError> {
    let now = Utc::now();
    let mut tx = begin_transaction(&state.pool).await?;
    let flashcard = flashcard_repo::mark_reviewed(&mut tx, id, auth.user_id, now)
        .await?
        .ok_or_else(|| AppError::NotFound("Flashcard not found".into()))?;
    let progress = activity::record(
        &mut tx,
        auth.user_id,
        ActivityKind::CardReviewed,
        today_local(&state.config.time_zone),
        now,
    )
    .await?;
    commit_transaction(tx).await?;

    Ok(Json(ReviewResponse {
        flashcard,
        progress,
    }))
}
