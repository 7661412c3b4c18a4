//! Preview Types
//!
//! State, status, events and errors of the preview server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of the preview server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreviewState {
    Stopped,
    Starting,
    Running,
    Error,
}

impl PreviewState {
    /// Whether a process is (or is about to be) attached.
    pub fn is_active(&self) -> bool {
        matches!(self, PreviewState::Starting | PreviewState::Running)
    }
}

impl std::fmt::Display for PreviewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreviewState::Stopped => write!(f, "STOPPED"),
            PreviewState::Starting => write!(f, "STARTING"),
            PreviewState::Running => write!(f, "RUNNING"),
            PreviewState::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogChannel {
    Stdout,
    Stderr,
}

/// One line of preview output (or a manager note).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub channel: LogChannel,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Snapshot returned by `PreviewManager::status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewStatus {
    pub state: PreviewState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

/// Broadcast to subscribers on every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreviewEvent {
    StateChange { state: PreviewState },
    Ready { port: u16 },
    Error { message: String },
    Stopping,
    Stopped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartOptions {
    /// Design to copy over `designs/current.tsx` before starting
    pub design_name: Option<String>,
}

impl StartOptions {
    pub fn design(name: impl Into<String>) -> Self {
        Self {
            design_name: Some(name.into()),
        }
    }
}

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Preview server is already {state}")]
    AlreadyActive { state: PreviewState },

    #[error("Preview server failed to start within {secs}s")]
    StartupTimeout { secs: u64 },

    #[error("Preview process error: {0}")]
    ProcessError(String),

    #[error("Could not find available port after {attempts} attempts starting at {start}")]
    PortExhausted { start: u16, attempts: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PreviewResult<T> = Result<T, PreviewError>;
