//! Settings Models
//!
//! Application configuration stored in `config.json`.

use design_studio_quality_gates::CheckerConfig;
use design_studio_tools::InstallCommand;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder replaced with the chosen port in the preview command.
pub const PORT_PLACEHOLDER: &str = "{port}";

/// Application configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Directory holding `designs/`
    pub workspace_root: PathBuf,
    /// Preview project: `package.json`, dev server, installs
    pub preview_root: PathBuf,
    /// Shared tooling configs (e.g. `.eslintrc.js`)
    pub tooling_root: PathBuf,
    pub preview: PreviewConfig,
    pub checkers: CheckerConfig,
    pub install: InstallCommand,
    pub agent: AgentConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::from("workspace"),
            preview_root: PathBuf::from("preview"),
            tooling_root: PathBuf::from("."),
            preview: PreviewConfig::default(),
            checkers: CheckerConfig::default(),
            install: InstallCommand::default(),
            agent: AgentConfig::default(),
        }
    }
}

/// Preview dev-server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewConfig {
    /// First port tried
    pub port: u16,
    /// Number of consecutive ports probed
    pub max_port_attempts: u16,
    pub startup_timeout_secs: u64,
    /// Seconds between SIGTERM and SIGKILL on stop
    pub stop_grace_secs: u64,
    pub log_capacity: usize,
    pub program: String,
    /// `{port}` is replaced with the chosen port
    pub args: Vec<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            port: 3002,
            max_port_attempts: 10,
            startup_timeout_secs: 30,
            stop_grace_secs: 2,
            log_capacity: 100,
            program: "npm".to_string(),
            args: ["run", "dev", "--", "--port", PORT_PLACEHOLDER]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl PreviewConfig {
    pub fn render_args(&self, port: u16) -> Vec<String> {
        let port = port.to_string();
        self.args
            .iter()
            .map(|arg| arg.replace(PORT_PLACEHOLDER, &port))
            .collect()
    }
}

/// Agent loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    pub max_iterations: u32,
    pub system_prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Minimum spacing between model calls in milliseconds (0 disables pacing)
    pub min_request_interval_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: None,
            max_tokens: Some(8192),
            min_request_interval_ms: 1000,
        }
    }
}

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a UI design agent. Build React components in TypeScript (TSX) \
using the provided tools. Save every component under the designs directory with a kebab-case .tsx filename. \
Install any npm package you import with add_dependency before using it. When the design is complete, call \
submit_work so it can be validated and previewed. If the request is ambiguous, call ask_user.";

/// Settings update request (partial update)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub workspace_root: Option<PathBuf>,
    pub preview_root: Option<PathBuf>,
    pub tooling_root: Option<PathBuf>,
    pub preview_port: Option<u16>,
    pub max_iterations: Option<u32>,
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(root) = update.workspace_root {
            self.workspace_root = root;
        }
        if let Some(root) = update.preview_root {
            self.preview_root = root;
        }
        if let Some(root) = update.tooling_root {
            self.tooling_root = root;
        }
        if let Some(port) = update.preview_port {
            self.preview.port = port;
        }
        if let Some(max) = update.max_iterations {
            self.agent.max_iterations = max;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.workspace_root.as_os_str().is_empty() {
            return Err("workspaceRoot must not be empty".to_string());
        }
        if self.preview.port == 0 {
            return Err("preview.port must be non-zero".to_string());
        }
        if self.preview.max_port_attempts == 0 {
            return Err("preview.maxPortAttempts must be at least 1".to_string());
        }
        if u32::from(self.preview.port) + u32::from(self.preview.max_port_attempts) > 65536 {
            return Err("preview port range exceeds 65535".to_string());
        }
        if self.preview.log_capacity == 0 {
            return Err("preview.logCapacity must be at least 1".to_string());
        }
        if self.preview.program.trim().is_empty() {
            return Err("preview.program must not be empty".to_string());
        }
        if self.agent.max_iterations == 0 {
            return Err("agent.maxIterations must be at least 1".to_string());
        }
        Ok(())
    }
}
