//! PostgreSQL database operations

mod focus;
mod projects;
mod sharing;
mod tags;
mod tasks;
mod trash;
mod users;

use sqlx::{postgres::PgPoolOptions, PgConnection, PgPool};

use projectflow_core::compute_progress;

use crate::error::Result;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Whether `users` carries the study streak columns.
    pub async fn streak_columns_present(&self) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM information_schema.columns
            WHERE table_schema = current_schema()
              AND table_name = 'users'
              AND column_name IN ('study_streak', 'last_study_date')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count == 2)
    }
}

/// Recompute `projects.progress` from the project's non-deleted tasks.
///
/// Locks the project row for the rest of the enclosing transaction so
/// concurrent task mutations on the same project serialize. Returns
/// `None` when the project does not exist.
pub(crate) async fn recalculate_progress(
    conn: &mut PgConnection,
    project_id: i64,
) -> Result<Option<i32>> {
    let locked: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT id FROM projects WHERE id = $1 FOR UPDATE
        "#,
    )
    .bind(project_id)
    .fetch_optional(&mut *conn)
    .await?;

    if locked.is_none() {
        return Ok(None);
    }

    let (total, completed): (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COUNT(*) FILTER (WHERE status = 'completed')
        FROM tasks
        WHERE project_id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(project_id)
    .fetch_one(&mut *conn)
    .await?;

    let progress = compute_progress(completed, total);

    sqlx::query(
        r#"
        UPDATE projects SET progress = $2 WHERE id = $1
        "#,
    )
    .bind(project_id)
    .bind(progress)
    .execute(&mut *conn)
    .await?;

    tracing::debug!(project_id, total, completed, progress, "Recalculated project progress");

    Ok(Some(progress))
}

/// Lock the project owning `task_id` when it belongs to `user_id`.
///
/// Task mutations take the project lock first so every writer acquires
/// locks in the same order.
pub(crate) async fn lock_task_project(
    conn: &mut PgConnection,
    task_id: i64,
    user_id: i64,
    active_project_only: bool,
) -> Result<Option<i64>> {
    let project_id = sqlx::query_scalar(
        r#"
        SELECT p.id
        FROM tasks t
        JOIN projects p ON p.id = t.project_id
        WHERE t.id = $1
          AND p.user_id = $2
          AND (NOT $3 OR p.deleted_at IS NULL)
        FOR UPDATE OF p
        "#,
    )
    .bind(task_id)
    .bind(user_id)
    .bind(active_project_only)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(project_id)
}

/// Whether a database error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
