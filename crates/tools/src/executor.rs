//! Tool Executor Core Types
//!
//! Result type returned by every design tool, and the execution context the
//! executors share.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::work_tracker::WorkTracker;

/// Result of a tool execution.
///
/// A failed result is reported back to the model as text; it does not abort
/// the turn. Faults that should abort the turn are returned as `Err` by the
/// dispatcher instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Structured payload for the caller (question + suggestions, installed
    /// package + version, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
            error: None,
            data: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.into()),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Convert to string for LLM consumption
    pub fn to_content(&self) -> String {
        if self.success {
            self.output.clone().unwrap_or_default()
        } else {
            format!(
                "Error: {}",
                self.error.as_deref().unwrap_or("Unknown error")
            )
        }
    }
}

/// External command used by `add_dependency`. The package spec is appended
/// as the final argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_install_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_install_timeout_secs() -> u64 {
    120
}

impl InstallCommand {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for InstallCommand {
    fn default() -> Self {
        Self {
            program: "npm".to_string(),
            args: vec!["install".to_string()],
            timeout_secs: default_install_timeout_secs(),
        }
    }
}

/// Everything an executor needs for one turn.
#[derive(Debug, Clone)]
pub struct ToolExecutionContext {
    /// Turn the results are recorded under.
    pub turn_id: String,
    /// Root holding `designs/`.
    pub workspace_root: PathBuf,
    /// Directory the package installer runs in.
    pub preview_root: PathBuf,
    pub tracker: Arc<WorkTracker>,
    pub install: InstallCommand,
}
