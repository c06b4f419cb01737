//! Request body builders for integration tests.

use serde_json::{json, Value};

pub fn register_request(name: &str, email: &str, password: &str) -> Value {
    json!({ "name": name, "email": email, "password": password })
}

pub fn login_request(email: &str, password: &str) -> Value {
    json!({ "email": email, "password": password })
}

pub fn project_request(title: &str) -> Value {
    json!({ "title": title, "description": "test project" })
}

pub fn project_with_deadline(title: &str, deadline: &str) -> Value {
    json!({ "title": title, "deadline": deadline })
}

pub fn task_request(project_id: i64, title: &str) -> Value {
    json!({ "project_id": project_id, "title": title })
}

pub fn task_with_due_date(project_id: i64, title: &str, due_date: &str) -> Value {
    json!({ "project_id": project_id, "title": title, "due_date": due_date })
}

pub fn tag_request(name: &str) -> Value {
    json!({ "name": name })
}

pub fn focus_start(project_id: Option<i64>, duration_minutes: i32) -> Value {
    json!({ "project_id": project_id, "duration_minutes": duration_minutes })
}

pub fn focus_end(tasks_completed: i32) -> Value {
    json!({ "tasks_completed": tasks_completed })
}
