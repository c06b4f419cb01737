//! Core types for the ProjectFlow domain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Task completion status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Todo
    }
}

impl TaskStatus {
    /// Status name as stored in the `tasks.status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Completed => "completed",
        }
    }

    /// The status a toggle moves to.
    pub fn toggled(self) -> Self {
        match self {
            Self::Todo => Self::Completed,
            Self::Completed => Self::Todo,
        }
    }

    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

impl FromStr for TaskStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Self::Todo),
            "completed" => Ok(Self::Completed),
            other => Err(CoreError::UnknownTaskStatus {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity types that can be moved to the trash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Task,
}

impl EntityKind {
    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Task => "Task",
        }
    }
}

/// Subscription plan attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    Free,
    Lite,
    Pro,
}

impl Default for PlanType {
    fn default() -> Self {
        Self::Free
    }
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Lite => "lite",
            Self::Pro => "pro",
        }
    }
}

impl FromStr for PlanType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "lite" => Ok(Self::Lite),
            "pro" => Ok(Self::Pro),
            other => Err(CoreError::UnknownPlanType {
                value: other.to_string(),
            }),
        }
    }
}

/// Check a requested focus session length.
pub fn validate_focus_duration(minutes: i32) -> Result<i32, CoreError> {
    if minutes <= 0 {
        return Err(CoreError::InvalidDuration { minutes });
    }
    Ok(minutes)
}
