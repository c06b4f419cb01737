//! Tag endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

const DEFAULT_TAG_COLOR: &str = "#6366f1";

/// GET /api/tags
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Tag>>> {
    Ok(Json(state.db.list_tags(auth.user_id).await?))
}

/// POST /api/tags
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(req): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>)> {
    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Tag name is required".to_string()))?;
    let color = req.color.as_deref().unwrap_or(DEFAULT_TAG_COLOR);

    let tag = state.db.create_tag(auth.user_id, name, color).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// PUT /api/tags/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTagRequest>,
) -> Result<Json<Tag>> {
    let name = req.name.as_deref().map(str::trim);
    if name == Some("") {
        return Err(ApiError::BadRequest("Tag name cannot be empty".to_string()));
    }

    let tag = state
        .db
        .update_tag(auth.user_id, id, name, req.color.as_deref())
        .await?
        .ok_or_else(|| ApiError::not_found("Tag", id))?;

    Ok(Json(tag))
}

/// DELETE /api/tags/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    if !state.db.delete_tag(auth.user_id, id).await? {
        return Err(ApiError::not_found("Tag", id));
    }
    Ok(Json(MessageResponse::new("Tag deleted")))
}
