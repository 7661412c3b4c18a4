//! Validation Models
//!
//! Findings, stage summaries and the overall result of validating one design
//! file.

use serde::{Deserialize, Serialize};

/// Which check produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    Dependency,
    Type,
    Lint,
    Deadcode,
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FindingKind::Dependency => write!(f, "dependency"),
            FindingKind::Type => write!(f, "type"),
            FindingKind::Lint => write!(f, "lint"),
            FindingKind::Deadcode => write!(f, "deadcode"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single diagnostic from any validation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub severity: Severity,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(
        kind: FindingKind,
        severity: Severity,
        file: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            file: file.into(),
            line: None,
            column: None,
            message: message.into(),
            code: None,
            suggestion: None,
        }
    }

    pub fn error(kind: FindingKind, file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Error, file, message)
    }

    pub fn warning(kind: FindingKind, file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Warning, file, message)
    }

    pub fn at(mut self, line: Option<u32>, column: Option<u32>) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
            if let Some(column) = self.column {
                write!(f, ":{}", column)?;
            }
        }
        write!(f, " {} [{}]", self.severity, self.kind)?;
        if let Some(code) = &self.code {
            write!(f, " {}", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

// ============================================================================
// Stages
// ============================================================================

/// The four validation stages, in merge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStage {
    Dependency,
    TypeCheck,
    Lint,
    DeadCode,
}

impl ValidationStage {
    pub const ALL: [ValidationStage; 4] = [
        ValidationStage::Dependency,
        ValidationStage::TypeCheck,
        ValidationStage::Lint,
        ValidationStage::DeadCode,
    ];

    /// Human-readable stage name used in progress messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ValidationStage::Dependency => "dependency check",
            ValidationStage::TypeCheck => "TypeScript compilation",
            ValidationStage::Lint => "ESLint check",
            ValidationStage::DeadCode => "dead code analysis",
        }
    }

    pub fn finding_kind(&self) -> FindingKind {
        match self {
            ValidationStage::Dependency => FindingKind::Dependency,
            ValidationStage::TypeCheck => FindingKind::Type,
            ValidationStage::Lint => FindingKind::Lint,
            ValidationStage::DeadCode => FindingKind::Deadcode,
        }
    }
}

impl std::fmt::Display for ValidationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    /// Ran and produced no error-severity finding
    Passed,
    /// Ran and produced at least one error-severity finding
    Failed,
    /// Not run (short-circuit or disabled)
    Skipped,
}

/// What one stage did, without its findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSummary {
    pub stage: ValidationStage,
    pub status: StageStatus,
    pub errors: usize,
    pub warnings: usize,
    pub duration_ms: u64,
}

/// Findings of one stage in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: ValidationStage,
    pub findings: Vec<ValidationError>,
    pub duration_ms: u64,
    pub skipped: bool,
}

impl StageReport {
    pub fn ran(stage: ValidationStage, findings: Vec<ValidationError>, duration_ms: u64) -> Self {
        Self {
            stage,
            findings,
            duration_ms,
            skipped: false,
        }
    }

    pub fn skipped(stage: ValidationStage) -> Self {
        Self {
            stage,
            findings: Vec::new(),
            duration_ms: 0,
            skipped: true,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(ValidationError::is_error)
    }

    fn summary(&self) -> StageSummary {
        let errors = self.findings.iter().filter(|f| f.is_error()).count();
        let status = if self.skipped {
            StageStatus::Skipped
        } else if errors > 0 {
            StageStatus::Failed
        } else {
            StageStatus::Passed
        };
        StageSummary {
            stage: self.stage,
            status,
            errors,
            warnings: self.findings.len() - errors,
            duration_ms: self.duration_ms,
        }
    }
}

// ============================================================================
// Result
// ============================================================================

/// Outcome of validating one file.
///
/// `success` is always `errors.is_empty()`; the only way to build one is
/// [`ValidationResult::from_reports`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub success: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
    #[serde(default)]
    pub stages: Vec<StageSummary>,
}

impl ValidationResult {
    /// Merge stage reports in the order given, splitting by severity.
    pub fn from_reports(reports: Vec<StageReport>) -> Self {
        let stages = reports.iter().map(StageReport::summary).collect();
        let (errors, warnings): (Vec<_>, Vec<_>) = reports
            .into_iter()
            .flat_map(|report| report.findings)
            .partition(ValidationError::is_error);
        Self {
            success: errors.is_empty(),
            errors,
            warnings,
            stages,
        }
    }

    /// Status of a given stage, if it was part of this run.
    pub fn stage_status(&self, stage: ValidationStage) -> Option<StageStatus> {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.status)
    }

    /// All findings, errors first.
    pub fn findings(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().chain(self.warnings.iter())
    }

    /// Error messages joined for a one-line report.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
