//! Core ProjectFlow library shared by the backend and its tests.
//!
//! Provides:
//! - Project progress formula
//! - Study streak state machine
//! - iCalendar feed writer for deadlines and due dates
//! - Shared domain types (TaskStatus, EntityKind, PlanType)

pub mod calendar;
pub mod error;
pub mod progress;
pub mod streak;
pub mod types;

pub use calendar::{render_calendar, CalendarEvent};
pub use error::{CoreError, Result};
pub use progress::compute_progress;
pub use streak::{StreakOutcome, StreakState, StreakTransition};
pub use types::{validate_focus_duration, EntityKind, PlanType, TaskStatus};
