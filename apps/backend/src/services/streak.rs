//! Study streak tracking.
//!
//! Streak columns are added by a later migration. Whether they exist is
//! probed once at startup; without them every engagement is a no-op that
//! reports a zero streak.

use chrono::NaiveDate;

use projectflow_core::StreakOutcome;

use crate::db::Database;
use crate::error::Result;
use crate::models::StreakResponse;

/// Outcome of recording one engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak: u32,
    pub updated: bool,
    pub outcome: Option<StreakOutcome>,
}

impl StreakUpdate {
    fn unavailable() -> Self {
        Self {
            streak: 0,
            updated: false,
            outcome: None,
        }
    }
}

impl From<StreakUpdate> for StreakResponse {
    fn from(update: StreakUpdate) -> Self {
        let message = match update.outcome {
            Some(StreakOutcome::AlreadyCounted) => Some("Already updated today".to_string()),
            Some(StreakOutcome::Extended) | Some(StreakOutcome::Started) => None,
            None => Some("Streak tracking unavailable".to_string()),
        };
        Self {
            streak: update.streak,
            updated: update.updated,
            message,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StreakTracker {
    enabled: bool,
}

impl StreakTracker {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Decide whether tracking can run: the feature flag must be on and
    /// the schema must carry the streak columns.
    pub async fn detect(db: &Database, wanted: bool) -> Result<Self> {
        if !wanted {
            tracing::info!("Streak tracking disabled by configuration");
            return Ok(Self::new(false));
        }
        let present = db.streak_columns_present().await?;
        if !present {
            tracing::warn!("Streak columns missing from users table, streak tracking disabled");
        }
        Ok(Self::new(present))
    }

    /// Record a qualifying engagement for `user_id` on `today`.
    pub async fn record_engagement(
        &self,
        db: &Database,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<StreakUpdate> {
        if !self.enabled {
            tracing::debug!(user_id, "Streak tracking unavailable, skipping update");
            return Ok(StreakUpdate::unavailable());
        }

        let Some(transition) = db.advance_streak(user_id, today).await? else {
            tracing::warn!(user_id, "Streak update for unknown user");
            return Ok(StreakUpdate::unavailable());
        };

        if transition.changed() {
            tracing::info!(
                user_id,
                streak = transition.state.streak,
                outcome = ?transition.outcome,
                "Study streak updated"
            );
        }

        Ok(StreakUpdate {
            streak: transition.state.streak,
            updated: transition.changed(),
            outcome: Some(transition.outcome),
        })
    }

    /// Current streak value, 0 when tracking is unavailable.
    pub async fn current(&self, db: &Database, user_id: i64) -> Result<u32> {
        if !self.enabled {
            return Ok(0);
        }
        Ok(db
            .get_streak_state(user_id)
            .await?
            .map(|state| state.streak)
            .unwrap_or(0))
    }
}
