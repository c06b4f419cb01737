//! Business logic services

pub mod auth;
pub mod dates;
pub mod sharing;
pub mod streak;
