//! Checker output parsers.
//!
//! Each external tool has its own output format; parsers turn raw
//! stdout/stderr into findings and never fail.

pub mod eslint;
pub mod knip;
pub mod typescript;

use crate::models::ValidationError;

pub use eslint::EslintParser;
pub use knip::KnipParser;
pub use typescript::TscParser;

/// Raw output of one checker run.
#[derive(Debug, Clone, Default)]
pub struct CheckerOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CheckerOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stdout and stderr joined, for parsers that read both.
    pub fn combined(&self) -> String {
        match (self.stdout.trim().is_empty(), self.stderr.trim().is_empty()) {
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
            (true, false) => self.stderr.clone(),
            _ => self.stdout.clone(),
        }
    }
}

/// Turns a checker's output into findings.
pub trait DiagnosticParser: Send + Sync {
    fn parse_diagnostics(&self, output: &CheckerOutput) -> Vec<ValidationError>;
}
