//! Read-only project sharing

use super::Database;
use crate::error::Result;
use crate::models::{SharedProject, SharedTask};

impl Database {
    /// Store the digest of a new share token on an active owned project.
    /// Any previous token stops working.
    pub async fn enable_sharing(&self, user_id: i64, project_id: i64, token_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE projects
            SET sharing_token_hash = $3, is_shared = TRUE
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(token_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn disable_sharing(&self, user_id: i64, project_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE projects
            SET sharing_token_hash = NULL, is_shared = FALSE
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Active shared project matching a token digest
    pub async fn get_shared_project(&self, token_hash: &str) -> Result<Option<SharedProject>> {
        let project = sqlx::query_as::<_, SharedProject>(
            r#"
            SELECT p.id, p.title, p.description, p.deadline, p.status, p.progress,
                   p.created_at, u.name AS owner_name
            FROM projects p
            JOIN users u ON u.id = p.user_id
            WHERE p.sharing_token_hash = $1
              AND p.is_shared = TRUE
              AND p.deleted_at IS NULL
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    /// Active tasks of a shared project
    pub async fn get_shared_tasks(&self, token_hash: &str) -> Result<Option<Vec<SharedTask>>> {
        let Some(project) = self.get_shared_project(token_hash).await? else {
            return Ok(None);
        };

        let tasks = sqlx::query_as::<_, SharedTask>(
            r#"
            SELECT id, title, description, due_date, status
            FROM tasks
            WHERE project_id = $1 AND deleted_at IS NULL
            ORDER BY due_date ASC NULLS LAST, id ASC
            "#,
        )
        .bind(project.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(tasks))
    }
}
