//! Core Error Types
//!
//! Foundational error type shared by every crate in the Design Studio
//! workspace. Validation findings are *not* errors: they travel as data in
//! `ValidationResult`. `CoreError` covers the faults around them (I/O,
//! malformed tool arguments, unparseable sources, checker launch failures).

use thiserror::Error;

/// Core error type for the Design Studio workspace.
///
/// The application crate wraps this in `AppError` together with preview and
/// provider failures.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// External command failed to launch or exited badly
    #[error("Command error: {0}")]
    Command(String),

    /// External command exceeded its time budget
    #[error("Command timed out after {secs}s: {program}")]
    Timeout { program: String, secs: u64 },

    /// Argument or filename validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Source or tool-output parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    pub fn timeout(program: impl Into<String>, secs: u64) -> Self {
        Self::Timeout {
            program: program.into(),
            secs,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Convert CoreError to a string (tool results carry plain text)
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
