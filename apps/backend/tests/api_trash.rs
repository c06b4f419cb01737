//! Trash (soft delete) API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable before running.

mod common;

use axum::http::{header::AUTHORIZATION, StatusCode};
use axum_test::TestServer;

use common::{create_project, create_task, project_progress, TestContext};

fn ids(values: &serde_json::Value) -> Vec<i64> {
    values
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect()
}

/// Trashing moves a project from the dashboard to the trash and back.
#[tokio::test]
#[ignore = "requires database"]
async fn test_project_trash_round_trip() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user("Ada").await;
    let auth = TestContext::auth_header_value(&token);

    let project_id = create_project(&server, &token, "Chemistry").await;
    let task_id = create_task(&server, &token, project_id, "lab").await;

    server
        .delete(&format!("/api/projects/{}", project_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();

    let dashboard: serde_json::Value = server
        .get("/api/dashboard")
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .json();
    assert!(!ids(&dashboard["projects"]).contains(&project_id));
    // Its task is hidden with it
    assert!(!ids(&dashboard["tasks"]).contains(&task_id));

    let trash: serde_json::Value = server
        .get("/api/trash")
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .json();
    assert_eq!(ids(&trash["projects"]), vec![project_id]);
    // The task itself was never trashed
    assert!(ids(&trash["tasks"]).is_empty());

    server
        .post(&format!("/api/projects/{}/restore", project_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();

    let dashboard: serde_json::Value = server
        .get("/api/dashboard")
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .json();
    assert!(ids(&dashboard["projects"]).contains(&project_id));
    assert!(ids(&dashboard["tasks"]).contains(&task_id));

    ctx.cleanup_user(user_id).await;
}

/// Trashing a task moves it from the dashboard to the trash and back,
/// and its project's progress follows.
#[tokio::test]
#[ignore = "requires database"]
async fn test_task_trash_round_trip() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user("Ada").await;
    let auth = TestContext::auth_header_value(&token);

    let project_id = create_project(&server, &token, "Biology").await;
    let done = create_task(&server, &token, project_id, "read chapter").await;
    let open = create_task(&server, &token, project_id, "flashcards").await;
    server
        .patch(&format!("/api/tasks/{}/toggle", done))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();
    assert_eq!(project_progress(&server, &token, project_id).await, 50);

    server
        .delete(&format!("/api/tasks/{}", open))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();
    assert_eq!(project_progress(&server, &token, project_id).await, 100);

    let dashboard: serde_json::Value = server
        .get("/api/dashboard")
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .json();
    assert!(!ids(&dashboard["tasks"]).contains(&open));
    assert!(ids(&dashboard["tasks"]).contains(&done));

    let trash: serde_json::Value = server
        .get("/api/trash")
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .json();
    assert_eq!(ids(&trash["tasks"]), vec![open]);
    assert!(ids(&trash["projects"]).is_empty());

    server
        .post(&format!("/api/tasks/{}/restore", open))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();
    assert_eq!(project_progress(&server, &token, project_id).await, 50);

    let dashboard: serde_json::Value = server
        .get("/api/dashboard")
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .json();
    assert!(ids(&dashboard["tasks"]).contains(&open));

    let trash: serde_json::Value = server
        .get("/api/trash")
        .add_header(AUTHORIZATION, auth)
        .await
        .json();
    assert!(ids(&trash["tasks"]).is_empty());

    ctx.cleanup_user(user_id).await;
}

/// A deleted task stays listed in the trash even when its project is
/// trashed too.
#[tokio::test]
#[ignore = "requires database"]
async fn test_trashed_task_listed_regardless_of_project() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user("Ada").await;
    let auth = TestContext::auth_header_value(&token);

    let project_id = create_project(&server, &token, "Physics").await;
    let task_id = create_task(&server, &token, project_id, "problem set").await;

    server
        .delete(&format!("/api/tasks/{}", task_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();
    server
        .delete(&format!("/api/projects/{}", project_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();

    let trash: serde_json::Value = server
        .get("/api/trash")
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .json();
    assert_eq!(ids(&trash["tasks"]), vec![task_id]);
    assert_eq!(trash["tasks"][0]["project_title"], "Physics");

    ctx.cleanup_user(user_id).await;
}

/// Each ledger step requires the matching deletion state.
#[tokio::test]
#[ignore = "requires database"]
async fn test_ledger_state_checks() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user("Ada").await;
    let auth = TestContext::auth_header_value(&token);

    let project_id = create_project(&server, &token, "Art").await;
    let task_id = create_task(&server, &token, project_id, "sketch").await;

    // Active rows cannot be restored or purged
    server
        .post(&format!("/api/tasks/{}/restore", task_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete(&format!("/api/tasks/{}/permanent", task_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete(&format!("/api/projects/{}/permanent", project_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert_eq!(ctx.count_task_rows(project_id).await, 1);

    // Deleting twice fails the second time
    server
        .delete(&format!("/api/tasks/{}", task_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();
    server
        .delete(&format!("/api/tasks/{}", task_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .delete(&format!("/api/tasks/{}/permanent", task_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();
    assert_eq!(ctx.count_task_rows(project_id).await, 0);

    server
        .post(&format!("/api/tasks/{}/restore", task_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_user(user_id).await;
}

/// Purging a project removes tasks in every deletion state.
#[tokio::test]
#[ignore = "requires database"]
async fn test_permanent_project_delete_cascades() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user("Ada").await;
    let auth = TestContext::auth_header_value(&token);

    let project_id = create_project(&server, &token, "Music").await;
    create_task(&server, &token, project_id, "scales").await;
    let trashed = create_task(&server, &token, project_id, "theory").await;
    server
        .delete(&format!("/api/tasks/{}", trashed))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();

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

    let trash: serde_json::Value = server
        .get("/api/trash")
        .add_header(AUTHORIZATION, auth)
        .await
        .json();
    assert!(ids(&trash["projects"]).is_empty());
    assert!(ids(&trash["tasks"]).is_empty());

    ctx.cleanup_user(user_id).await;
}
