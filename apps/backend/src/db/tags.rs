//! Tag persistence

use super::{is_unique_violation, Database};
use crate::error::{ApiError, Result};
use crate::models::Tag;

impl Database {
    pub async fn list_tags(&self, user_id: i64) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, name, color FROM tags
            WHERE user_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    pub async fn create_tag(&self, user_id: i64, name: &str, color: &str) -> Result<Tag> {
        let result = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (user_id, name, color)
            VALUES ($1, $2, $3)
            RETURNING id, name, color
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(color)
        .fetch_one(&self.pool)
        .await;

        map_tag_write(result)
    }

    /// Update name and/or color; absent fields keep their value
    pub async fn update_tag(
        &self,
        user_id: i64,
        tag_id: i64,
        name: Option<&str>,
        color: Option<&str>,
    ) -> Result<Option<Tag>> {
        let result = sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags
            SET name = COALESCE($3, name), color = COALESCE($4, color)
            WHERE id = $1 AND user_id = $2
            RETURNING id, name, color
            "#,
        )
        .bind(tag_id)
        .bind(user_id)
        .bind(name)
        .bind(color)
        .fetch_optional(&self.pool)
        .await;

        map_tag_write(result)
    }

    pub async fn delete_tag(&self, user_id: i64, tag_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM tags WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(tag_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_tag_write<T>(result: std::result::Result<T, sqlx::Error>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if is_unique_violation(&e) => {
            Err(ApiError::BadRequest("Tag already exists".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
