//! Flashcards owned by a user, plus the request and response payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::types::{FlashcardId, UserId};
use crate::validation::rules;

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn db_value(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Flashcard {
    pub id: FlashcardId,
    pub user_id: UserId,
    pub subject: String,
    pub notes: String,
    pub question: String,
    pub answer: String,
    /// One of `easy`, `medium`, `hard`.
    pub difficulty: String,
    pub times_reviewed: i32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Flashcard {
    pub fn new(user_id: UserId, subject: &str, notes: &str, card: &NewFlashcard) -> Self {
        let now = Utc::now();
        Self {
            id: FlashcardId::new(),
            user_id,
            subject: subject.trim().to_string(),
            notes: notes.to_string(),
            question: card.question.trim().to_string(),
            answer: card.answer.trim().to_string(),
            difficulty: card.difficulty.unwrap_or_default().db_value().to_string(),
            times_reviewed: 0,
            last_reviewed: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewFlashcard {
    #[validate(custom(function = "rules::validate_not_blank"))]
    pub question: String,
    #[validate(custom(function = "rules::validate_not_blank"))]
    pub answer: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
/// Batch of cards saved under one subject.
pub struct SaveFlashcardsRequest {
    #[validate(
        length(max = 50),
        custom(function = "rules::validate_not_blank")
    )]
    pub subject: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[validate(length(min = 1, max = 100), nested)]
    pub flashcards: Vec<NewFlashcard>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveFlashcardsResponse {
    pub message: String,
    pub count: usize,
    pub progress: super::progress::ActivityOutcome,
}

#[derive(Debug, Default, Deserialize)]
pub struct FlashcardListQuery {
    pub subject: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl FlashcardListQuery {
    /// Subject filter, treating `all` and blank values as no filter.
    pub fn subject_filter(&self) -> Option<&str> {
        self.subject
            .as_deref()
            .map(str::trim)
            .filter(|subject| !subject.is_empty() && *subject != "all")
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FlashcardListResponse {
    pub flashcards: Vec<Flashcard>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub flashcard: Flashcard,
    pub progress: super::progress::ActivityOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_clamps_pagination() {
        let query = FlashcardListQuery {
            subject: Some("all".into()),
            limit: Some(500),
            offset: Some(-3),
        };
        assert_eq!(query.subject_filter(), None);
        assert_eq!(query.limit(), MAX_PAGE_SIZE);
        assert_eq!(query.offset(), 0);

        let defaults = FlashcardListQuery::default();
        assert_eq!(defaults.limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn save_request_requires_non_blank_cards() {
        let request: SaveFlashcardsRequest = serde_json::from_value(serde_json::json!({
            "subject": "biology",
            "flashcards": [{"question": "What is ATP?", "answer": "  "}]
        }))
        .expect("deserialize");
        assert!(request.validate().is_err());
    }

    #[test]
    fn save_request_rejects_empty_batch() {
        let request = SaveFlashcardsRequest {
            subject: "math".into(),
            notes: None,
            flashcards: vec![],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn new_card_defaults_to_medium_difficulty() {
        let card = NewFlashcard {
            question: " 2 + 2? ".into(),
            answer: "4".into(),
            difficulty: None,
        };
        let flashcard = Flashcard::new(UserId::new(), "math", "", &card);
        assert_eq!(flashcard.difficulty, "medium");
        assert_eq!(flashcard.question, "2 + 2?");
    }
}
