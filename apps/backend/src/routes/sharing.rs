//! Read-only project sharing

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::sharing::{hash_share_token, share_url, ShareToken};
use crate::AppState;

/// POST /api/projects/{id}/share
pub async fn enable(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<ShareResponse>> {
    let share = ShareToken::generate();

    if !state.db.enable_sharing(auth.user_id, id, &share.hash).await? {
        return Err(ApiError::not_found("Project", id));
    }

    tracing::info!(project_id = id, user_id = auth.user_id, "Project sharing enabled");

    Ok(Json(ShareResponse {
        share_url: share_url(&state.config.frontend_url, &share.token),
        sharing_token: share.token,
    }))
}

/// DELETE /api/projects/{id}/share
pub async fn disable(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    if !state.db.disable_sharing(auth.user_id, id).await? {
        return Err(ApiError::not_found("Project", id));
    }
    Ok(Json(MessageResponse::new("Sharing disabled")))
}

/// GET /api/projects/shared/{token}
pub async fn shared_project(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<SharedProject>> {
    let project = state
        .db
        .get_shared_project(&hash_share_token(&token))
        .await?
        .ok_or_else(|| ApiError::NotFound("Shared project not found".to_string()))?;

    Ok(Json(project))
}

/// GET /api/projects/shared/{token}/tasks
pub async fn shared_tasks(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<Vec<SharedTask>>> {
    let tasks = state
        .db
        .get_shared_tasks(&hash_share_token(&token))
        .await?
        .ok_or_else(|| ApiError::NotFound("Shared project not found".to_string()))?;

    Ok(Json(tasks))
}
