//! Error types for projectflow-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while interpreting domain values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown task status: {value}")]
    UnknownTaskStatus { value: String },

    #[error("unknown plan type: {value}")]
    UnknownPlanType { value: String },

    #[error("focus duration must be greater than zero, got {minutes}")]
    InvalidDuration { minutes: i32 },
}
