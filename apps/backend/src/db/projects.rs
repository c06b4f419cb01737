//! Project persistence

use super::Database;
use crate::error::Result;
use crate::models::{CreateProjectRequest, Project};

const PROJECT_COLUMNS: &str = "id, user_id, title, description, deadline, status, progress, \
                               is_shared, created_at, deleted_at";

impl Database {
    /// Create a project with zero progress
    pub async fn create_project(&self, user_id: i64, req: &CreateProjectRequest) -> Result<Project> {
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (user_id, title, description, deadline)
            VALUES ($1, $2, $3, $4)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(req.title.trim())
        .bind(&req.description)
        .bind(req.deadline)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    /// Get an owned project regardless of its trash state
    pub async fn get_project(&self, user_id: i64, project_id: i64) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS}
            FROM projects
            WHERE id = $1 AND user_id = $2
            "#
        ))
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    /// Active projects, newest first
    pub async fn get_active_projects(&self, user_id: i64) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS}
            FROM projects
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    /// Active projects that have a deadline
    pub async fn get_projects_with_deadline(&self, user_id: i64) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS}
            FROM projects
            WHERE user_id = $1 AND deleted_at IS NULL AND deadline IS NOT NULL
            ORDER BY deadline ASC, id ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }
}
