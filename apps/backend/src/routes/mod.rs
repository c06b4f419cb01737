//! HTTP route handlers

pub mod auth;
pub mod calendar;
pub mod dashboard;
pub mod focus;
pub mod projects;
pub mod sharing;
pub mod tags;
pub mod tasks;
pub mod trash;
pub mod users;
