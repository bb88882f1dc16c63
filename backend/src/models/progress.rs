//! Read models for streak, experience and study statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{streak::StreakUpdate, xp_event::XpGrant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// What a single recorded activity did to the user's progress.
pub struct ActivityOutcome {
    pub points_awarded: i32,
    pub streak: StreakUpdate,
    pub xp: XpGrant,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub xp: i64,
    pub level: i32,
    /// XP earned since reaching the current level.
    pub xp_into_level: i64,
    /// XP still missing to reach the next level.
    pub xp_to_next_level: i64,
    pub current_streak: i32,
    pub best_streak: i32,
    pub last_streak_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubjectCount {
    pub subject: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_flashcards: i64,
    pub reviewed_today: i64,
    pub streak_days: i32,
    pub best_streak: i32,
    pub xp: i64,
    pub level: i32,
    pub most_reviewed_subject: Option<String>,
    pub by_subject: Vec<SubjectCount>,
}
