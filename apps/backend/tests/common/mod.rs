//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - Helpers for creating users and issuing their tokens
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use uuid::Uuid;

use projectflow_backend::config::Config;
use projectflow_backend::db::Database;
use projectflow_backend::services::auth::{hash_password, issue_token};
use projectflow_backend::services::streak::StreakTracker;
use projectflow_backend::{build_router, AppState};

pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Test context containing database connection and test server.
///
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    app: Router,
}

impl TestContext {
    /// Create a new test context with streak tracking detected from the schema.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        Self::with_streak_tracking(true).await
    }

    /// Create a test context whose streak tracking is forced off.
    pub async fn without_streak_tracking() -> Self {
        Self::with_streak_tracking(false).await
    }

    async fn with_streak_tracking(wanted: bool) -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some(database_url.clone()),
            "JWT_SECRET" => Some("integration-test-secret-0123456789".to_string()),
            "FRONTEND_URL" => Some("http://frontend.test".to_string()),
            _ => None,
        })
        .expect("Failed to build test config");

        let db = Database::connect(&config.database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let streak = StreakTracker::detect(&db, wanted)
            .await
            .expect("Failed to probe streak columns");

        let db = Arc::new(db);
        let config = Arc::new(config);

        let state = AppState {
            db: db.clone(),
            config: config.clone(),
            streak,
        };

        let app = build_router(state);

        Self { db, config, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user and return its ID and access token.
    pub async fn create_test_user(&self, name: &str) -> (i64, String) {
        let email = format!("{}-{}@test.projectflow", name.to_lowercase(), Uuid::new_v4().simple());
        let hash = hash_password(TEST_PASSWORD).expect("Failed to hash password");
        let user = self
            .db
            .create_user(name, &email, &hash)
            .await
            .expect("Failed to create test user");

        let token = issue_token(user.id, &user.email, false, "free", &self.config.jwt)
            .expect("Failed to issue token");

        (user.id, token)
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Number of task rows, deleted or not, under a project id.
    pub async fn count_task_rows(&self, project_id: i64) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(self.db.pool())
            .await
            .expect("Failed to count tasks")
    }

    /// Move a user's last study date, simulating engagement on another day.
    pub async fn set_last_study_date(&self, user_id: i64, streak: i32, date: chrono::NaiveDate) {
        sqlx::query("UPDATE users SET study_streak = $2, last_study_date = $3 WHERE id = $1")
            .bind(user_id)
            .bind(streak)
            .bind(date)
            .execute(self.db.pool())
            .await
            .expect("Failed to set streak");
    }

    /// Clean up test data for a user.
    ///
    /// Call this after tests to remove test data.
    pub async fn cleanup_user(&self, user_id: i64) {
        // Tasks do not cascade from projects
        let _ = sqlx::query(
            "DELETE FROM tasks WHERE project_id IN (SELECT id FROM projects WHERE user_id = $1)",
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await;

        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }
}

/// Create a project through the API and return its id.
pub async fn create_project(server: &axum_test::TestServer, token: &str, title: &str) -> i64 {
    let response = server
        .post("/api/projects")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(token),
        )
        .json(&fixtures::project_request(title))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<serde_json::Value>()["id"].as_i64().unwrap()
}

/// Create a task through the API and return its id.
pub async fn create_task(
    server: &axum_test::TestServer,
    token: &str,
    project_id: i64,
    title: &str,
) -> i64 {
    let response = server
        .post("/api/tasks")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(token),
        )
        .json(&fixtures::task_request(project_id, title))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<serde_json::Value>()["id"].as_i64().unwrap()
}

/// Read a project's stored progress through the API.
pub async fn project_progress(server: &axum_test::TestServer, token: &str, project_id: i64) -> i64 {
    let response = server
        .get(&format!("/api/projects/{}", project_id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(token),
        )
        .await;
    response.assert_status_ok();
    response.json::<serde_json::Value>()["progress"].as_i64().unwrap()
}
