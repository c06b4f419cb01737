//! Database models and API types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use projectflow_core::{PlanType, TaskStatus};

use crate::error::Result;

// === Database Entity Types ===

/// Registered account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_premium: bool,
    pub plan_type: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Public view without credentials
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            is_premium: self.is_premium,
            plan_type: self.plan_type.parse().unwrap_or_default(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_premium: bool,
    pub plan_type: PlanType,
    pub created_at: DateTime<Utc>,
}

/// Project stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub status: String,
    pub progress: i32,
    pub is_shared: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Task stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Typed status
    pub fn task_status(&self) -> Result<TaskStatus> {
        Ok(self.status.parse()?)
    }
}

/// Active task as shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DashboardTask {
    pub id: i64,
    pub project_id: i64,
    pub project_title: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub tag_ids: Vec<i64>,
}

/// Soft-deleted project in the trash view
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrashedProject {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub progress: i32,
    pub deleted_at: DateTime<Utc>,
}

/// Soft-deleted task in the trash view
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrashedTask {
    pub id: i64,
    pub project_id: i64,
    pub project_title: String,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub deleted_at: DateTime<Utc>,
}

/// User-defined label
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: String,
}

/// Pomodoro-style focus session
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FocusSession {
    pub id: i64,
    pub user_id: i64,
    pub project_id: Option<i64>,
    pub duration_minutes: i32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub tasks_completed: i32,
}

/// Result of trying to finish a focus session
#[derive(Debug, Clone)]
pub enum EndSession {
    /// `first_today` is set when no other session of the user ended
    /// earlier on the same local day.
    Ended {
        session: FocusSession,
        first_today: bool,
    },
    AlreadyEnded,
    NotFound,
}

/// Aggregated focus counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FocusTotals {
    pub week_sessions: i64,
    pub week_minutes: i64,
    pub today_sessions: i64,
    pub today_minutes: i64,
}

/// Project visible through a share link
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SharedProject {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub status: String,
    pub progress: i32,
    pub created_at: DateTime<Utc>,
    pub owner_name: String,
}

/// Task visible through a share link
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SharedTask {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: String,
}

/// Task row feeding the calendar export
#[derive(Debug, Clone, FromRow)]
pub struct CalendarTask {
    pub id: i64,
    pub title: String,
    pub due_date: NaiveDate,
    pub status: String,
    pub project_title: String,
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// Auth types
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

// Streak types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakResponse {
    pub streak: u32,
    pub updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// Project types
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<NaiveDate>,
}

// Task types
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleTaskResponse {
    #[serde(flatten)]
    pub task: Task,
    pub project_progress: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<StreakResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetTaskTagsRequest {
    pub tag_ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskTagsResponse {
    pub task_id: i64,
    pub tag_ids: Vec<i64>,
}

// Dashboard and trash types
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardQuery {
    pub tag_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub projects: Vec<Project>,
    pub tasks: Vec<DashboardTask>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrashResponse {
    pub projects: Vec<TrashedProject>,
    pub tasks: Vec<TrashedTask>,
}

// Focus types
#[derive(Debug, Serialize, Deserialize)]
pub struct StartFocusRequest {
    #[serde(alias = "projectId")]
    pub project_id: Option<i64>,
    #[serde(alias = "durationMinutes")]
    pub duration_minutes: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartFocusResponse {
    pub session_id: i64,
    pub started_at: DateTime<Utc>,
    pub duration_minutes: i32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EndFocusRequest {
    #[serde(alias = "tasksCompleted")]
    pub tasks_completed: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EndFocusResponse {
    pub session: FocusSession,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<StreakResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FocusStatsResponse {
    #[serde(flatten)]
    pub totals: FocusTotals,
    pub study_streak: u32,
}

// Tag types
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTagRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

// Sharing types
#[derive(Debug, Serialize, Deserialize)]
pub struct ShareResponse {
    pub sharing_token: String,
    pub share_url: String,
}

// Calendar types
#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarQuery {
    pub token: Option<String>,
}
