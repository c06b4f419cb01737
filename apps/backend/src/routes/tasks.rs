//! Task endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use projectflow_core::EntityKind;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::dates::local_today;
use crate::AppState;

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>)> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Task title is required".to_string()));
    }

    let (task, progress) = state
        .db
        .create_task(auth.user_id, &req)
        .await?
        .ok_or_else(|| ApiError::not_found("Project", req.project_id))?;

    tracing::info!(task_id = task.id, project_id = task.project_id, progress, "Created task");

    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/tasks/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<Task>> {
    let task = state
        .db
        .get_task(auth.user_id, id)
        .await?
        .filter(|t| t.deleted_at.is_none())
        .ok_or_else(|| ApiError::not_found("Task", id))?;

    Ok(Json(task))
}

/// PATCH /api/tasks/{id}/toggle
///
/// Completing a task counts as a study engagement for the streak.
pub async fn toggle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<ToggleTaskResponse>> {
    let (task, project_progress) = state
        .db
        .toggle_task(auth.user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task", id))?;

    let streak = if task.task_status()?.is_completed() {
        let update = state
            .streak
            .record_engagement(&state.db, auth.user_id, local_today())
            .await?;
        Some(update.into())
    } else {
        None
    };

    Ok(Json(ToggleTaskResponse {
        task,
        project_progress,
        streak,
    }))
}

/// DELETE /api/tasks/{id}
pub async fn soft_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    if !state.db.soft_delete(EntityKind::Task, id, auth.user_id).await? {
        return Err(ApiError::not_found("Task", id));
    }
    Ok(Json(MessageResponse::new("Task moved to trash")))
}

/// POST /api/tasks/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    if !state.db.restore(EntityKind::Task, id, auth.user_id).await? {
        return Err(ApiError::NotFound(format!("Task {id} not found in trash")));
    }
    Ok(Json(MessageResponse::new("Task restored")))
}

/// DELETE /api/tasks/{id}/permanent
pub async fn permanent_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    if !state
        .db
        .permanently_delete(EntityKind::Task, id, auth.user_id)
        .await?
    {
        return Err(ApiError::NotFound(format!("Task {id} not found in trash")));
    }
    Ok(Json(MessageResponse::new("Task permanently deleted")))
}

/// PUT /api/tasks/{id}/tags
pub async fn set_tags(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(req): Json<SetTaskTagsRequest>,
) -> Result<Json<TaskTagsResponse>> {
    if !state.db.set_task_tags(auth.user_id, id, &req.tag_ids).await? {
        return Err(ApiError::not_found("Task", id));
    }

    let mut tag_ids = req.tag_ids;
    tag_ids.sort_unstable();
    tag_ids.dedup();

    Ok(Json(TaskTagsResponse { task_id: id, tag_ids }))
}
