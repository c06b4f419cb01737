//! Soft-delete ledger for projects and tasks
//!
//! Soft delete and restore only flip `deleted_at`. Permanent delete only
//! touches rows that are already in the trash. Trashing a project leaves
//! its tasks alone; they are hidden by the project filter and come back
//! with it.

use projectflow_core::EntityKind;

use super::{lock_task_project, recalculate_progress, Database};
use crate::error::Result;
use crate::models::{TrashedProject, TrashedTask};

impl Database {
    /// Move an owned, active entity to the trash.
    ///
    /// Returns `false` when nothing matched.
    pub async fn soft_delete(&self, kind: EntityKind, id: i64, user_id: i64) -> Result<bool> {
        let found = match kind {
            EntityKind::Project => self.set_project_deleted(id, user_id, true).await?,
            EntityKind::Task => self.set_task_deleted(id, user_id, true).await?,
        };

        if found {
            tracing::info!(entity = kind.label(), id, user_id, "Moved to trash");
        }
        Ok(found)
    }

    /// Bring an owned entity back from the trash.
    pub async fn restore(&self, kind: EntityKind, id: i64, user_id: i64) -> Result<bool> {
        let found = match kind {
            EntityKind::Project => self.set_project_deleted(id, user_id, false).await?,
            EntityKind::Task => self.set_task_deleted(id, user_id, false).await?,
        };

        if found {
            tracing::info!(entity = kind.label(), id, user_id, "Restored from trash");
        }
        Ok(found)
    }

    /// Irreversibly remove an owned entity that is already in the trash.
    pub async fn permanently_delete(&self, kind: EntityKind, id: i64, user_id: i64) -> Result<bool> {
        let found = match kind {
            EntityKind::Project => self.purge_project(id, user_id).await?,
            EntityKind::Task => self.purge_task(id, user_id).await?,
        };

        if found {
            tracing::info!(entity = kind.label(), id, user_id, "Permanently deleted");
        }
        Ok(found)
    }

    /// Trashed projects and tasks, most recently deleted first
    pub async fn list_trash(&self, user_id: i64) -> Result<(Vec<TrashedProject>, Vec<TrashedTask>)> {
        let projects = sqlx::query_as::<_, TrashedProject>(
            r#"
            SELECT id, title, description, deadline, progress, deleted_at
            FROM projects
            WHERE user_id = $1 AND deleted_at IS NOT NULL
            ORDER BY deleted_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let tasks = sqlx::query_as::<_, TrashedTask>(
            r#"
            SELECT t.id, t.project_id, p.title AS project_title, t.title,
                   t.due_date, t.status, t.deleted_at
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE p.user_id = $1 AND t.deleted_at IS NOT NULL
            ORDER BY t.deleted_at DESC, t.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok((projects, tasks))
    }

    async fn set_project_deleted(&self, project_id: i64, user_id: i64, deleted: bool) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE projects
            SET deleted_at = CASE WHEN $3 THEN NOW() ELSE NULL END
            WHERE id = $1
              AND user_id = $2
              AND (deleted_at IS NULL) = $3
            RETURNING id
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(deleted)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(false);
        }

        if !deleted {
            recalculate_progress(&mut *tx, project_id).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn set_task_deleted(&self, task_id: i64, user_id: i64, deleted: bool) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let Some(project_id) = lock_task_project(&mut *tx, task_id, user_id, false).await? else {
            return Ok(false);
        };

        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET deleted_at = CASE WHEN $2 THEN NOW() ELSE NULL END
            WHERE id = $1 AND (deleted_at IS NULL) = $2
            "#,
        )
        .bind(task_id)
        .bind(deleted)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        recalculate_progress(&mut *tx, project_id).await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn purge_project(&self, project_id: i64, user_id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM projects
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NOT NULL
            FOR UPDATE
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            return Ok(false);
        }

        let tasks = sqlx::query(
            r#"
            DELETE FROM tasks WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM projects WHERE id = $1
            "#,
        )
        .bind(project_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(project_id, tasks = tasks.rows_affected(), "Purged project and its tasks");
        Ok(true)
    }

    async fn purge_task(&self, task_id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks t
            USING projects p
            WHERE t.id = $1
              AND t.project_id = p.id
              AND p.user_id = $2
              AND t.deleted_at IS NOT NULL
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
