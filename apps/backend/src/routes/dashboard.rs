//! Dashboard endpoint

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/dashboard
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>> {
    let projects = state.db.get_active_projects(auth.user_id).await?;
    let tasks = state.db.get_active_tasks(auth.user_id, query.tag_id).await?;

    Ok(Json(DashboardResponse { projects, tasks }))
}
