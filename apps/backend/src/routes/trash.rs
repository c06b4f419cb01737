//! Trash view

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/trash
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<TrashResponse>> {
    let (projects, tasks) = state.db.list_trash(auth.user_id).await?;
    Ok(Json(TrashResponse { projects, tasks }))
}
