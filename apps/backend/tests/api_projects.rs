//! Project, task and progress API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable before running.

mod common;

use axum::http::{header::AUTHORIZATION, StatusCode};
use axum_test::TestServer;

use common::{create_project, create_task, fixtures, project_progress, TestContext};

/// New projects start at zero progress.
#[tokio::test]
#[ignore = "requires database"]
async fn test_create_project() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user("Ada").await;

    let response = server
        .post("/api/projects")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::project_request("Thesis"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "Thesis");
    assert_eq!(body["progress"], 0);
    assert!(body["deleted_at"].is_null());

    ctx.cleanup_user(user_id).await;
}

/// Blank titles are rejected.
#[tokio::test]
#[ignore = "requires database"]
async fn test_create_project_requires_title() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user("Ada").await;

    let response = server
        .post("/api/projects")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::project_request("   "))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    ctx.cleanup_user(user_id).await;
}

/// 4 tasks with 2 completed is 50%; trashing a completed one gives 33%;
/// restoring it gives 50% again; purging the project removes every task.
#[tokio::test]
#[ignore = "requires database"]
async fn test_progress_follows_task_lifecycle() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user("Ada").await;
    let auth = TestContext::auth_header_value(&token);

    let project_id = create_project(&server, &token, "Biology").await;
    let mut task_ids = Vec::new();
    for title in ["read", "notes", "quiz", "essay"] {
        task_ids.push(create_task(&server, &token, project_id, title).await);
    }
    assert_eq!(project_progress(&server, &token, project_id).await, 0);

    for id in &task_ids[..2] {
        server
            .patch(&format!("/api/tasks/{}/toggle", id))
            .add_header(AUTHORIZATION, auth.clone())
            .await
            .assert_status_ok();
    }
    assert_eq!(project_progress(&server, &token, project_id).await, 50);

    server
        .delete(&format!("/api/tasks/{}", task_ids[0]))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();
    assert_eq!(project_progress(&server, &token, project_id).await, 33);

    server
        .post(&format!("/api/tasks/{}/restore", task_ids[0]))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();
    assert_eq!(project_progress(&server, &token, project_id).await, 50);

    server
        .delete(&format!("/api/projects/{}", project_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();
    server
        .delete(&format!("/api/projects/{}/permanent", project_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();

    assert_eq!(ctx.count_task_rows(project_id).await, 0);
    server
        .get(&format!("/api/projects/{}", project_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    for id in &task_ids {
        server
            .get(&format!("/api/tasks/{}", id))
            .add_header(AUTHORIZATION, auth.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    ctx.cleanup_user(user_id).await;
}

/// One of three tasks completed rounds to 33, two of three to 67.
#[tokio::test]
#[ignore = "requires database"]
async fn test_progress_rounding() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user("Ada").await;
    let auth = TestContext::auth_header_value(&token);

    let project_id = create_project(&server, &token, "Maths").await;
    let a = create_task(&server, &token, project_id, "a").await;
    let b = create_task(&server, &token, project_id, "b").await;
    create_task(&server, &token, project_id, "c").await;

    let response = server
        .patch(&format!("/api/tasks/{}/toggle", a))
        .add_header(AUTHORIZATION, auth.clone())
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "completed");
    assert_eq!(body["project_progress"], 33);

    let response = server
        .patch(&format!("/api/tasks/{}/toggle", b))
        .add_header(AUTHORIZATION, auth.clone())
        .await;
    assert_eq!(response.json::<serde_json::Value>()["project_progress"], 67);

    // Toggling back drops the completion
    let response = server
        .patch(&format!("/api/tasks/{}/toggle", b))
        .add_header(AUTHORIZATION, auth.clone())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "todo");
    assert_eq!(body["project_progress"], 33);
    assert!(body.get("streak").is_none());

    ctx.cleanup_user(user_id).await;
}

/// Creating a task raises the denominator.
#[tokio::test]
#[ignore = "requires database"]
async fn test_new_task_lowers_progress() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user("Ada").await;

    let project_id = create_project(&server, &token, "History").await;
    let task = create_task(&server, &token, project_id, "one").await;
    server
        .patch(&format!("/api/tasks/{}/toggle", task))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await
        .assert_status_ok();
    assert_eq!(project_progress(&server, &token, project_id).await, 100);

    create_task(&server, &token, project_id, "two").await;
    assert_eq!(project_progress(&server, &token, project_id).await, 50);

    ctx.cleanup_user(user_id).await;
}

/// Tasks cannot be added to trashed projects.
#[tokio::test]
#[ignore = "requires database"]
async fn test_create_task_in_trashed_project() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user("Ada").await;
    let auth = TestContext::auth_header_value(&token);

    let project_id = create_project(&server, &token, "Old").await;
    server
        .delete(&format!("/api/projects/{}", project_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();

    let response = server
        .post("/api/tasks")
        .add_header(AUTHORIZATION, auth)
        .json(&fixtures::task_request(project_id, "late"))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_user(user_id).await;
}

/// Other users' projects and tasks look like they do not exist.
#[tokio::test]
#[ignore = "requires database"]
async fn test_ownership_is_enforced() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (owner_id, owner_token) = ctx.create_test_user("Owner").await;
    let (other_id, other_token) = ctx.create_test_user("Other").await;
    let other = TestContext::auth_header_value(&other_token);

    let project_id = create_project(&server, &owner_token, "Private").await;
    let task_id = create_task(&server, &owner_token, project_id, "secret").await;

    server
        .get(&format!("/api/projects/{}", project_id))
        .add_header(AUTHORIZATION, other.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .patch(&format!("/api/tasks/{}/toggle", task_id))
        .add_header(AUTHORIZATION, other.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete(&format!("/api/tasks/{}", task_id))
        .add_header(AUTHORIZATION, other.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete(&format!("/api/projects/{}", project_id))
        .add_header(AUTHORIZATION, other)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    assert_eq!(project_progress(&server, &owner_token, project_id).await, 0);

    ctx.cleanup_user(owner_id).await;
    ctx.cleanup_user(other_id).await;
}

/// Toggling a trashed task is not possible.
#[tokio::test]
#[ignore = "requires database"]
async fn test_toggle_trashed_task() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user("Ada").await;
    let auth = TestContext::auth_header_value(&token);

    let project_id = create_project(&server, &token, "P").await;
    let task_id = create_task(&server, &token, project_id, "t").await;
    server
        .delete(&format!("/api/tasks/{}", task_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();

    server
        .patch(&format!("/api/tasks/{}/toggle", task_id))
        .add_header(AUTHORIZATION, auth)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_user(user_id).await;
}
