//! Focus session persistence

use chrono::{DateTime, Utc};

use super::Database;
use crate::error::Result;
use crate::models::{EndSession, FocusSession, FocusTotals};

const SESSION_COLUMNS: &str =
    "id, user_id, project_id, duration_minutes, started_at, ended_at, tasks_completed";

impl Database {
    /// Start a session, optionally bound to an active owned project.
    ///
    /// Returns `None` when the project is not visible to the user.
    pub async fn start_focus_session(
        &self,
        user_id: i64,
        project_id: Option<i64>,
        duration_minutes: i32,
    ) -> Result<Option<FocusSession>> {
        if let Some(project_id) = project_id {
            let visible: Option<i64> = sqlx::query_scalar(
                r#"
                SELECT id FROM projects
                WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
                "#,
            )
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

            if visible.is_none() {
                return Ok(None);
            }
        }

        let session = sqlx::query_as::<_, FocusSession>(&format!(
            r#"
            INSERT INTO focus_sessions (user_id, project_id, duration_minutes)
            VALUES ($1, $2, $3)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(project_id)
        .bind(duration_minutes)
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(session))
    }

    /// Finish a session. A finished session is never modified again.
    ///
    /// `day` bounds the caller's local calendar day. The user row is locked
    /// first so concurrent finishes agree on which one was the first of
    /// that day.
    pub async fn end_focus_session(
        &self,
        user_id: i64,
        session_id: i64,
        tasks_completed: i32,
        ended_at: DateTime<Utc>,
        day: (DateTime<Utc>, DateTime<Utc>),
    ) -> Result<EndSession> {
        let mut tx = self.pool.begin().await?;

        let user: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM users WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if user.is_none() {
            return Ok(EndSession::NotFound);
        }

        let current: Option<Option<DateTime<Utc>>> = sqlx::query_scalar(
            r#"
            SELECT ended_at FROM focus_sessions
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        match current {
            None => return Ok(EndSession::NotFound),
            Some(Some(_)) => return Ok(EndSession::AlreadyEnded),
            Some(None) => {}
        }

        let session = sqlx::query_as::<_, FocusSession>(&format!(
            r#"
            UPDATE focus_sessions
            SET ended_at = $2, tasks_completed = $3
            WHERE id = $1
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(session_id)
        .bind(ended_at)
        .bind(tasks_completed)
        .fetch_one(&mut *tx)
        .await?;

        let (day_start, day_end) = day;
        let ended_today: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM focus_sessions
            WHERE user_id = $1 AND ended_at >= $2 AND ended_at < $3
            "#,
        )
        .bind(user_id)
        .bind(day_start)
        .bind(day_end)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(EndSession::Ended {
            session,
            first_today: ended_today == 1,
        })
    }

    /// Finished-session counters for the trailing week and the given day
    pub async fn focus_totals(
        &self,
        user_id: i64,
        week_start: DateTime<Utc>,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<FocusTotals> {
        let (week_sessions, week_minutes, today_sessions, today_minutes): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    COUNT(*) FILTER (WHERE ended_at >= $2),
                    COALESCE(SUM(duration_minutes) FILTER (WHERE ended_at >= $2), 0)::BIGINT,
                    COUNT(*) FILTER (WHERE ended_at >= $3 AND ended_at < $4),
                    COALESCE(SUM(duration_minutes) FILTER (WHERE ended_at >= $3 AND ended_at < $4), 0)::BIGINT
                FROM focus_sessions
                WHERE user_id = $1 AND ended_at IS NOT NULL
                "#,
            )
            .bind(user_id)
            .bind(week_start)
            .bind(day_start)
            .bind(day_end)
            .fetch_one(&self.pool)
            .await?;

        Ok(FocusTotals {
            week_sessions,
            week_minutes,
            today_sessions,
            today_minutes,
        })
    }
}
