use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::types::{StudySessionId, UserId};
use crate::validation::rules;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudySession {
    pub id: StudySessionId,
    pub user_id: UserId,
    pub subject: String,
    pub flashcards_studied: i32,
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
}

fn default_subject() -> String {
    "general".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogStudySessionRequest {
    #[serde(default = "default_subject")]
    #[validate(length(max = 50), custom(function = "rules::validate_not_blank"))]
    pub subject: String,
    #[serde(default)]
    #[validate(range(min = 0, max = 10_000))]
    pub flashcards_studied: i32,
    #[serde(default, alias = "session_duration_minutes")]
    #[validate(range(min = 0, max = 1440))]
    pub duration_minutes: i32,
}

impl StudySession {
    pub fn from_request(user_id: UserId, request: &LogStudySessionRequest) -> Self {
        Self {
            id: StudySessionId::new(),
            user_id,
            subject: request.subject.trim().to_string(),
            flashcards_studied: request.flashcards_studied,
            duration_minutes: request.duration_minutes,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StudySessionResponse {
    pub session: StudySession,
    pub progress: super::progress::ActivityOutcome,
}
