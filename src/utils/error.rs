//! Error Handling
//!
//! Unified error types for the application.
//! Uses thiserror for ergonomic error definitions.

use design_studio_core::CoreError;
use design_studio_llm::LlmError;
use thiserror::Error;

use crate::services::preview::PreviewError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Tool, parser and checker faults
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Model provider errors
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Preview server errors
    #[error("Preview error: {0}")]
    Preview(#[from] PreviewError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// A turn is already in flight
    #[error("Another turn is already in progress")]
    Busy,

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Convert AppError to a string suitable for transport responses
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::config("missing workspace");
        assert_eq!(err.to_string(), "Configuration error: missing workspace");
        assert_eq!(AppError::Busy.to_string(), "Another turn is already in progress");
    }

    #[test]
    fn test_error_conversion() {
        let err = AppError::config("invalid setting");
        let msg: String = err.into();
        assert!(msg.contains("Configuration error"));
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: AppError = CoreError::not_found("Unknown tool: paint").into();
        assert_eq!(err.to_string(), "Not found: Unknown tool: paint");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_preview_error_conversion() {
        let err: AppError = PreviewError::StartupTimeout { secs: 30 }.into();
        assert!(matches!(err, AppError::Preview(_)));
        assert!(err.to_string().contains("30s"));
    }
}
