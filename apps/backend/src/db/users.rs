//! Users and study streak persistence

use chrono::NaiveDate;

use projectflow_core::{StreakState, StreakTransition};

use super::{is_unique_violation, Database};
use crate::error::{ApiError, Result};
use crate::models::User;

impl Database {
    /// Create a new user account
    pub async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, is_premium, plan_type, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => {
                Err(ApiError::BadRequest("User already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, is_premium, plan_type, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by id
    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, is_premium, plan_type, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    // === Study Streak ===

    /// Read the stored streak fields
    pub async fn get_streak_state(&self, user_id: i64) -> Result<Option<StreakState>> {
        let row: Option<(i32, Option<NaiveDate>)> = sqlx::query_as(
            r#"
            SELECT study_streak, last_study_date
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(streak, last)| StreakState::new(streak_from_db(streak), last)))
    }

    /// Apply one engagement on `today` under a row lock.
    ///
    /// Two concurrent engagements on the same day both observe the state
    /// after the first one commits, so the streak advances once.
    pub async fn advance_streak(
        &self,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<Option<StreakTransition>> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(i32, Option<NaiveDate>)> = sqlx::query_as(
            r#"
            SELECT study_streak, last_study_date
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((streak, last)) = row else {
            return Ok(None);
        };

        let transition = StreakState::new(streak_from_db(streak), last).advance(today);

        if transition.changed() {
            sqlx::query(
                r#"
                UPDATE users
                SET study_streak = $2, last_study_date = $3
                WHERE id = $1
                "#,
            )
            .bind(user_id)
            .bind(i32::try_from(transition.state.streak).unwrap_or(i32::MAX))
            .bind(transition.state.last_study_date)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(transition))
    }
}

fn streak_from_db(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}
