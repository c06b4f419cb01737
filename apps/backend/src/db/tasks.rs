//! Task persistence
//!
//! Every mutation that changes the set of non-deleted tasks or their
//! status recomputes the owning project's progress in the same
//! transaction.

use projectflow_core::TaskStatus;

use super::{lock_task_project, recalculate_progress, Database};
use crate::error::{ApiError, Result};
use crate::models::{CalendarTask, CreateTaskRequest, DashboardTask, Task};

const TASK_COLUMNS: &str =
    "id, project_id, title, description, due_date, status, created_at, deleted_at";

impl Database {
    /// Create a task under an active owned project.
    ///
    /// Returns the task and the project's new progress, or `None` when the
    /// project is missing, trashed or owned by someone else.
    pub async fn create_task(
        &self,
        user_id: i64,
        req: &CreateTaskRequest,
    ) -> Result<Option<(Task, i32)>> {
        let mut tx = self.pool.begin().await?;

        let project: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM projects
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(req.project_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(project_id) = project else {
            return Ok(None);
        };

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (project_id, title, description, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(project_id)
        .bind(req.title.trim())
        .bind(&req.description)
        .bind(req.due_date)
        .fetch_one(&mut *tx)
        .await?;

        let progress = recalculate_progress(&mut *tx, project_id)
            .await?
            .unwrap_or_default();

        tx.commit().await?;
        Ok(Some((task, progress)))
    }

    /// Get an owned task regardless of trash state
    pub async fn get_task(&self, user_id: i64, task_id: i64) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.id, t.project_id, t.title, t.description, t.due_date,
                   t.status, t.created_at, t.deleted_at
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE t.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Flip a non-deleted task between todo and completed.
    ///
    /// Returns the updated task and the project's new progress.
    pub async fn toggle_task(&self, user_id: i64, task_id: i64) -> Result<Option<(Task, i32)>> {
        let mut tx = self.pool.begin().await?;

        let Some(project_id) = lock_task_project(&mut *tx, task_id, user_id, true).await? else {
            return Ok(None);
        };

        let current: Option<String> = sqlx::query_scalar(
            r#"
            SELECT status FROM tasks WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(task_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            return Ok(None);
        };
        let next = current.parse::<TaskStatus>()?.toggled();

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks SET status = $2 WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task_id)
        .bind(next.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let progress = recalculate_progress(&mut *tx, project_id)
            .await?
            .unwrap_or_default();

        tx.commit().await?;
        Ok(Some((task, progress)))
    }

    /// Replace the tag set of an owned task.
    ///
    /// Every tag id must belong to the same user.
    pub async fn set_task_tags(&self, user_id: i64, task_id: i64, tag_ids: &[i64]) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        if lock_task_project(&mut *tx, task_id, user_id, false)
            .await?
            .is_none()
        {
            return Ok(false);
        }

        let mut unique = tag_ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let owned: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tags WHERE user_id = $1 AND id = ANY($2)
            "#,
        )
        .bind(user_id)
        .bind(&unique)
        .fetch_one(&mut *tx)
        .await?;

        if owned != unique.len() as i64 {
            return Err(ApiError::BadRequest("Unknown tag id".to_string()));
        }

        sqlx::query(
            r#"
            DELETE FROM task_tags WHERE task_id = $1
            "#,
        )
        .bind(task_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO task_tags (task_id, tag_id)
            SELECT $1, UNNEST($2::BIGINT[])
            "#,
        )
        .bind(task_id)
        .bind(&unique)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Active tasks under active projects, optionally filtered by tag
    pub async fn get_active_tasks(
        &self,
        user_id: i64,
        tag_id: Option<i64>,
    ) -> Result<Vec<DashboardTask>> {
        let tasks = sqlx::query_as::<_, DashboardTask>(
            r#"
            SELECT t.id, t.project_id, p.title AS project_title, t.title, t.description,
                   t.due_date, t.status, t.created_at,
                   COALESCE(
                       ARRAY_AGG(tt.tag_id ORDER BY tt.tag_id) FILTER (WHERE tt.tag_id IS NOT NULL),
                       '{}'
                   ) AS tag_ids
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            LEFT JOIN task_tags tt ON tt.task_id = t.id
            WHERE p.user_id = $1
              AND t.deleted_at IS NULL
              AND p.deleted_at IS NULL
              AND (
                  $2::BIGINT IS NULL
                  OR EXISTS (SELECT 1 FROM task_tags f WHERE f.task_id = t.id AND f.tag_id = $2)
              )
            GROUP BY t.id, p.title
            ORDER BY t.due_date ASC NULLS LAST, t.id ASC
            "#,
        )
        .bind(user_id)
        .bind(tag_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Active tasks with a due date under active projects
    pub async fn get_tasks_with_due_date(&self, user_id: i64) -> Result<Vec<CalendarTask>> {
        let tasks = sqlx::query_as::<_, CalendarTask>(
            r#"
            SELECT t.id, t.title, t.due_date, t.status, p.title AS project_title
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE p.user_id = $1
              AND t.deleted_at IS NULL
              AND p.deleted_at IS NULL
              AND t.due_date IS NOT NULL
            ORDER BY t.due_date ASC, t.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }
}
