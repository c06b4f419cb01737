//! Consecutive-day study streak.
//!
//! A streak advances at most once per calendar day. Both task completion
//! and the first finished focus session of a day feed the same
//! transition, [`StreakState::advance`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Persisted streak fields of a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub streak: u32,
    pub last_study_date: Option<NaiveDate>,
}

/// What a qualifying engagement did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakOutcome {
    /// An engagement was already recorded today.
    AlreadyCounted,
    /// Last engagement was yesterday; streak grew by one.
    Extended,
    /// No usable history (none, a gap, or a date ahead of today); streak is 1.
    Started,
}

/// Result of applying an engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakTransition {
    pub state: StreakState,
    pub outcome: StreakOutcome,
}

impl StreakTransition {
    /// Whether the stored state has to be written back.
    pub fn changed(&self) -> bool {
        self.outcome != StreakOutcome::AlreadyCounted
    }
}

impl StreakState {
    pub fn new(streak: u32, last_study_date: Option<NaiveDate>) -> Self {
        Self {
            streak,
            last_study_date,
        }
    }

    /// Apply a qualifying engagement that happened on `today`.
    pub fn advance(&self, today: NaiveDate) -> StreakTransition {
        match self.last_study_date {
            Some(last) if last == today => StreakTransition {
                state: *self,
                outcome: StreakOutcome::AlreadyCounted,
            },
            Some(last) if today.pred_opt() == Some(last) => StreakTransition {
                state: Self::new(self.streak.saturating_add(1), Some(today)),
                outcome: StreakOutcome::Extended,
            },
            _ => StreakTransition {
                state: Self::new(1, Some(today)),
                outcome: StreakOutcome::Started,
            },
        }
    }
}
