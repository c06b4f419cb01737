//! iCalendar export
//!
//! Calendar clients cannot send headers, so the token may also travel in
//! the query string.

use axum::{
    extract::{Query, State},
    http::{
        header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderMap,
    },
    response::IntoResponse,
};
use chrono::Utc;

use projectflow_core::{render_calendar, CalendarEvent, TaskStatus};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::bearer_token;
use crate::services::auth::validate_token;
use crate::AppState;

/// GET /api/calendar.ics
pub async fn feed(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let token = match query.token.as_deref().filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => bearer_token(&headers)?,
    };
    let user_id = validate_token(token, &state.config.jwt)?.sub;

    let projects = state.db.get_projects_with_deadline(user_id).await?;
    let tasks = state.db.get_tasks_with_due_date(user_id).await?;

    let mut events = Vec::with_capacity(projects.len() + tasks.len());
    for project in &projects {
        if let Some(deadline) = project.deadline {
            events.push(CalendarEvent::project(
                project.id,
                &project.title,
                project.progress,
                deadline,
            ));
        }
    }
    for task in &tasks {
        let status: TaskStatus = task.status.parse()?;
        events.push(CalendarEvent::task(
            task.id,
            &task.title,
            Some(task.project_title.as_str()),
            status,
            task.due_date,
        ));
    }

    tracing::debug!(user_id, events = events.len(), "Rendering calendar feed");

    let body = render_calendar(&events, Utc::now());
    let disposition = format!("attachment; filename=\"projectflow-{user_id}.ics\"");

    Ok((
        [
            (CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, disposition),
            (CACHE_CONTROL, "no-store".to_string()),
        ],
        body,
    ))
}
