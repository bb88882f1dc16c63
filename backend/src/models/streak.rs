use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::UserId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Activity tally for one user on one calendar date.
pub struct StreakRecord {
    pub user_id: UserId,
    pub study_date: NaiveDate,
    pub count: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Result of recording one unit of activity.
pub struct StreakUpdate {
    pub current_streak: i32,
    pub best_streak: i32,
    /// Units recorded on the activity date, including this one.
    pub day_count: i32,
}
