//! Focus session endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{Duration, Utc};

use projectflow_core::validate_focus_duration;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::dates::{local_day_bounds, local_today};
use crate::AppState;

/// POST /api/focus/start
pub async fn start(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(req): Json<StartFocusRequest>,
) -> Result<(StatusCode, Json<StartFocusResponse>)> {
    let duration_minutes = validate_focus_duration(req.duration_minutes)?;

    let session = state
        .db
        .start_focus_session(auth.user_id, req.project_id, duration_minutes)
        .await?
        .ok_or_else(|| ApiError::not_found("Project", req.project_id.unwrap_or_default()))?;

    tracing::info!(session_id = session.id, user_id = auth.user_id, duration_minutes, "Focus session started");

    Ok((
        StatusCode::CREATED,
        Json(StartFocusResponse {
            session_id: session.id,
            started_at: session.started_at,
            duration_minutes: session.duration_minutes,
        }),
    ))
}

/// POST /api/focus/{id}/end
///
/// The first session finished on a local calendar day counts as a study
/// engagement for the streak.
pub async fn end(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    body: Option<Json<EndFocusRequest>>,
) -> Result<Json<EndFocusResponse>> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let tasks_completed = req.tasks_completed.unwrap_or(0).max(0);

    let today = local_today();

    let (session, first_today) = match state
        .db
        .end_focus_session(
            auth.user_id,
            id,
            tasks_completed,
            Utc::now(),
            local_day_bounds(today),
        )
        .await?
    {
        EndSession::Ended {
            session,
            first_today,
        } => (session, first_today),
        EndSession::AlreadyEnded => {
            return Err(ApiError::Conflict(format!("Focus session {id} already ended")));
        }
        EndSession::NotFound => return Err(ApiError::not_found("Focus session", id)),
    };

    let streak = if first_today {
        let update = state
            .streak
            .record_engagement(&state.db, auth.user_id, today)
            .await?;
        Some(update.into())
    } else {
        None
    };

    Ok(Json(EndFocusResponse {
        session,
        message: "Focus session completed".to_string(),
        streak,
    }))
}

/// GET /api/focus/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<FocusStatsResponse>> {
    let now = Utc::now();
    let (day_start, day_end) = local_day_bounds(local_today());

    let totals = state
        .db
        .focus_totals(auth.user_id, now - Duration::days(7), day_start, day_end)
        .await?;
    let study_streak = state.streak.current(&state.db, auth.user_id).await?;

    Ok(Json(FocusStatsResponse {
        totals,
        study_streak,
    }))
}
