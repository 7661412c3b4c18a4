//! `knip --no-progress` output.
//!
//! Knip prints sections such as `Unused exports (2):` followed by file
//! entries and box-drawn finding lines. Anything unrecognised is skipped.

use regex::Regex;
use std::sync::OnceLock;

use super::{CheckerOutput, DiagnosticParser};
use crate::models::{FindingKind, ValidationError};

const TREE_PREFIX: &str = r"^[├│─└┌]+\s*";

fn tree_prefix_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TREE_PREFIX).ok()).as_ref()
}

fn location_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r":(\d+):\d+").ok()).as_ref()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct KnipParser;

impl DiagnosticParser for KnipParser {
    fn parse_diagnostics(&self, output: &CheckerOutput) -> Vec<ValidationError> {
        let (Some(prefix), Some(location)) = (tree_prefix_regex(), location_regex()) else {
            return Vec::new();
        };
        let text = if output.stderr.trim().is_empty() {
            &output.stdout
        } else {
            &output.stderr
        };

        let mut findings = Vec::new();
        let mut section = String::new();
        let mut current_file: Option<String> = None;

        for raw in text.lines() {
            let trimmed = raw.trim();
            if trimmed.contains("Unused") && trimmed.contains(':') {
                section = trimmed.to_string();
                continue;
            }
            if trimmed.starts_with('.') && trimmed.contains(".tsx") {
                current_file = Some(trimmed.to_string());
                continue;
            }
            let Some(file) = current_file.as_ref() else {
                continue;
            };
            if trimmed.is_empty() || raw.starts_with('└') || raw.starts_with('┌') {
                continue;
            }
            let entry = prefix.replace(raw, "");
            let entry = entry.trim();
            if entry.is_empty() || entry.contains("Unused") {
                continue;
            }
            let line = location
                .captures(entry)
                .and_then(|caps| caps[1].parse().ok());
            findings.push(
                ValidationError::warning(
                    FindingKind::Deadcode,
                    file.clone(),
                    format!("{}: {}", section, entry),
                )
                .at(line, None),
            );
        }
        findings
    }
}
