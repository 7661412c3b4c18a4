//! Turn outcomes returned by the orchestrator.

use design_studio_quality_gates::ValidationResult;
use serde::{Deserialize, Serialize};

/// A design that passed validation and was persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedFile {
    pub filename: String,
    /// Identifiers inserted or re-minted
    pub ids_added: usize,
    pub duplicates_found: usize,
    /// Port the preview came up on
    pub preview_port: u16,
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// The model replied without calling a tool.
    Answered { text: String },
    /// `submit_work` ran and every pending file was validated, injected,
    /// persisted and previewed.
    Submitted {
        final_text: Option<String>,
        files: Vec<SubmittedFile>,
    },
    ValidationFailed {
        filename: String,
        result: ValidationResult,
    },
    PreviewFailed { filename: String, error: String },
    /// The iteration cap was reached without a submission.
    IterationLimit {
        iterations: u32,
        last_text: Option<String>,
    },
}

impl TurnOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TurnOutcome::Answered { .. } | TurnOutcome::Submitted { .. })
    }
}
