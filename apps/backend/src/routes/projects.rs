//! Project endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use projectflow_core::EntityKind;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>)> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Project title is required".to_string()));
    }

    let project = state.db.create_project(auth.user_id, &req).await?;
    tracing::info!(project_id = project.id, user_id = auth.user_id, "Created project");

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/projects/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<Project>> {
    let project = state
        .db
        .get_project(auth.user_id, id)
        .await?
        .filter(|p| p.deleted_at.is_none())
        .ok_or_else(|| ApiError::not_found("Project", id))?;

    Ok(Json(project))
}

/// DELETE /api/projects/{id}
pub async fn soft_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    if !state.db.soft_delete(EntityKind::Project, id, auth.user_id).await? {
        return Err(ApiError::not_found("Project", id));
    }
    Ok(Json(MessageResponse::new("Project moved to trash")))
}

/// POST /api/projects/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    if !state.db.restore(EntityKind::Project, id, auth.user_id).await? {
        return Err(ApiError::NotFound(format!("Project {id} not found in trash")));
    }
    Ok(Json(MessageResponse::new("Project restored")))
}

/// DELETE /api/projects/{id}/permanent
pub async fn permanent_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    if !state
        .db
        .permanently_delete(EntityKind::Project, id, auth.user_id)
        .await?
    {
        return Err(ApiError::NotFound(format!("Project {id} not found in trash")));
    }
    Ok(Json(MessageResponse::new("Project permanently deleted")))
}
