//! Design Studio Quality Gates
//!
//! Validation of generated design files before they reach the preview:
//!
//! - `models` - Findings and results (`ValidationError`, `ValidationResult`, `ValidationStage`)
//! - `config` - External checker commands (`CheckerCommand`, `CheckerConfig`)
//! - `dependency` - Import vs. `package.json` check
//! - `parsers` - Output parsers for tsc, ESLint and knip
//! - `runner` - Timed subprocess execution
//! - `pipeline` - The staged pipeline (`ValidationPipeline`)

pub mod config;
pub mod dependency;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod runner;

// Re-export model types
pub use models::{
    FindingKind, Severity, StageReport, StageStatus, StageSummary, ValidationError,
    ValidationResult, ValidationStage,
};

// Re-export configuration
pub use config::{CheckerCommand, CheckerConfig};

// Re-export parsers
pub use parsers::{CheckerOutput, DiagnosticParser, EslintParser, KnipParser, TscParser};

// Re-export pipeline
pub use pipeline::ValidationPipeline;
