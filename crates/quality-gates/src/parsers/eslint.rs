//! `eslint --format json` output.
//!
//! The JSON array is located between the first `[` and the last `]`, since
//! npx may print banners around it. Plain-text output falls back to a
//! `line:col message` scan.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use super::{CheckerOutput, DiagnosticParser};
use crate::models::{FindingKind, Severity, ValidationError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EslintFileReport {
    #[serde(default)]
    file_path: String,
    #[serde(default)]
    messages: Vec<EslintMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EslintMessage {
    #[serde(default)]
    rule_id: Option<String>,
    #[serde(default)]
    severity: u8,
    #[serde(default)]
    message: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    column: Option<u32>,
}

fn fallback_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+):(\d+)\s+(.*)").ok())
        .as_ref()
}

fn json_slice(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

fn severity_of(level: u8) -> Option<Severity> {
    match level {
        0 => None,
        1 => Some(Severity::Warning),
        _ => Some(Severity::Error),
    }
}

fn from_reports(reports: Vec<EslintFileReport>) -> Vec<ValidationError> {
    reports
        .into_iter()
        .flat_map(|report| {
            let file = report.file_path;
            report.messages.into_iter().filter_map(move |msg| {
                let severity = severity_of(msg.severity)?;
                let mut finding = ValidationError::new(
                    FindingKind::Lint,
                    severity,
                    file.clone(),
                    msg.message,
                )
                .at(msg.line, msg.column);
                if let Some(rule) = msg.rule_id {
                    finding = finding.with_code(rule);
                }
                Some(finding)
            })
        })
        .collect()
}

fn from_plain_text(text: &str) -> Vec<ValidationError> {
    let Some(re) = fallback_regex() else {
        return Vec::new();
    };
    text.lines()
        .filter_map(|line| re.captures(line))
        .map(|caps| {
            ValidationError::error(FindingKind::Lint, "unknown", caps[3].trim())
                .at(caps[1].parse().ok(), caps[2].parse().ok())
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EslintParser;

impl DiagnosticParser for EslintParser {
    fn parse_diagnostics(&self, output: &CheckerOutput) -> Vec<ValidationError> {
        let text = output.combined();
        let Some(slice) = json_slice(&text) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<EslintFileReport>>(slice) {
            Ok(reports) => from_reports(reports),
            Err(e) => {
                tracing::debug!(error = %e, "ESLint output is not JSON, using line fallback");
                from_plain_text(&text)
            }
        }
    }
}
