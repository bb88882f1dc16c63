//! Activity recorder: turns a study action into a streak update plus an XP
//! grant, both inside the caller's transaction.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgConnection;

use crate::{
    error::CoreError,
    models::progress::ActivityOutcome,
    services::{streak, xp},
    types::UserId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    CardsCreated { count: u32 },
    CardReviewed,
    StudySessionLogged,
    TaskCompleted,
}

impl ActivityKind {
    pub fn points(&self) -> i32 {
        match self {
            ActivityKind::CardsCreated { count } => {
                i32::try_from(*count).unwrap_or(i32::MAX / 10).saturating_mul(10)
            }
            ActivityKind::CardReviewed => 5,
            ActivityKind::StudySessionLogged => 15,
            ActivityKind::TaskCompleted => 20,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            ActivityKind::CardsCreated { .. } => "cards_created",
            ActivityKind::CardReviewed => "card_reviewed",
            ActivityKind::StudySessionLogged => "study_session",
            ActivityKind::TaskCompleted => "task_completed",
        }
    }
}

pub async fn record(
    conn: &mut PgConnection,
    user_id: UserId,
    kind: ActivityKind,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<ActivityOutcome, CoreError> {
    let points = kind.points();
    let streak = streak::record_activity_in(conn, user_id, today, now).await?;
    let xp = xp::grant_in(conn, user_id, points, kind.reason(), now).await?;
    tracing::debug!(%user_id, reason = kind.reason(), points, "activity recorded");
    Ok(ActivityOutcome {
        points_awarded: points,
        streak,
        xp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_per_activity() {
        assert_eq!(ActivityKind::CardsCreated { count: 3 }.points(), 30);
        assert_eq!(ActivityKind::CardReviewed.points(), 5);
        assert_eq!(ActivityKind::StudySessionLogged.points(), 15);
        assert_eq!(ActivityKind::TaskCompleted.points(), 20);
    }

    #[test]
    fn reasons_are_stable_ledger_keys() {
        assert_eq!(ActivityKind::CardsCreated { count: 1 }.reason(), "cards_created");
        assert_eq!(ActivityKind::StudySessionLogged.reason(), "study_session");
    }

    #[test]
    fn huge_batches_saturate() {
        assert!(ActivityKind::CardsCreated { count: u32::MAX }.points() > 0);
    }
}
