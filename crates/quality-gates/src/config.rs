//! Checker Configuration
//!
//! External checker commands and the scratch layout used while validating.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Placeholder replaced with the staged file path in checker arguments.
pub const FILE_PLACEHOLDER: &str = "{file}";

/// One external checker invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckerCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_enabled() -> bool {
    true
}

impl CheckerCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            timeout_secs: default_timeout_secs(),
            enabled: true,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Arguments with `{file}` substituted.
    pub fn render_args(&self, file: &Path) -> Vec<String> {
        let file = file.to_string_lossy();
        self.args
            .iter()
            .map(|arg| arg.replace(FILE_PLACEHOLDER, &file))
            .collect()
    }

    /// `program arg1 arg2`, for log lines.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// The three subprocess checkers plus staging options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckerConfig {
    pub type_check: CheckerCommand,
    pub lint: CheckerCommand,
    pub dead_code: CheckerCommand,
    /// Directory under the workspace root that receives staged sources
    pub staging_dir: String,
    /// Lint config copied from the tooling root when the workspace lacks one
    pub eslint_config_file: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            type_check: CheckerCommand::new(
                "npx",
                &[
                    "tsc",
                    "--noEmit",
                    "--jsx",
                    "react",
                    "--esModuleInterop",
                    "--skipLibCheck",
                    FILE_PLACEHOLDER,
                ],
            ),
            lint: CheckerCommand::new("npx", &["eslint", "--format", "json", FILE_PLACEHOLDER]),
            dead_code: CheckerCommand::new("npx", &["knip", "--no-progress"]),
            staging_dir: "__validation__".to_string(),
            eslint_config_file: ".eslintrc.js".to_string(),
        }
    }
}
