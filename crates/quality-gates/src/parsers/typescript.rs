//! `tsc --noEmit` output.

use regex::Regex;
use std::sync::OnceLock;

use super::{CheckerOutput, DiagnosticParser};
use crate::models::{FindingKind, ValidationError};

fn diagnostic_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^(.+?)\((\d+),(\d+)\):\s+error\s+TS(\d+):\s+(.+)$").ok()
    })
    .as_ref()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TscParser;

impl DiagnosticParser for TscParser {
    fn parse_diagnostics(&self, output: &CheckerOutput) -> Vec<ValidationError> {
        let Some(re) = diagnostic_regex() else {
            return Vec::new();
        };
        let text = output.combined();
        re.captures_iter(&text)
            .map(|caps| {
                let line = caps[2].parse().ok();
                let column = caps[3].parse().ok();
                ValidationError::error(FindingKind::Type, caps[1].trim(), caps[5].trim())
                    .at(line, column)
                    .with_code(format!("TS{}", &caps[4]))
            })
            .collect()
    }
}
