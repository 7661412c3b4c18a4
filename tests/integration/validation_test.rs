//! Validation Pipeline Integration Tests
//!
//! Drives `ValidationPipeline` with shell stand-ins that print real checker
//! output formats.

#![cfg(unix)]

use std::fs;
use tempfile::TempDir;

use design_studio_quality_gates::{
    CheckerConfig, FindingKind, Severity, StageStatus, ValidationPipeline, ValidationStage,
};

use super::common::{passing_checkers, sh};

const HERO: &str = r#"import React from 'react';

export default function Hero() {
  return <h1 className="title">Hello</h1>;
}
"#;

fn project(deps: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        format!(r#"{{"name": "preview", "dependencies": {{{}}}}}"#, deps),
    )
    .unwrap();
    dir
}

#[tokio::test]
async fn test_clean_design_passes_every_stage() {
    let dir = project(r#""react": "^18.2.0""#);
    let pipeline = ValidationPipeline::new(dir.path(), dir.path()).with_config(passing_checkers());

    let result = pipeline.validate(HERO, "hero.tsx").await;
    assert!(result.success);
    assert!(result.errors.is_empty());
    for stage in ValidationStage::ALL {
        assert_eq!(result.stage_status(stage), Some(StageStatus::Passed));
    }
}

#[tokio::test]
async fn test_checker_output_formats_are_parsed() {
    let dir = project(r#""react": "^18.2.0""#);
    let tsc = "echo \"hero.tsx(4,10): error TS2322: Type 'string' is not assignable to type 'number'.\"; exit 2";
    let eslint = r#"echo '[{"filePath":"hero.tsx","messages":[{"ruleId":"no-unused-vars","severity":1,"message":"x is unused","line":2,"column":7}]}]'; exit 1"#;
    let knip = "echo 'Unused exports (1):'; echo './designs/hero.tsx'; echo '├─ Helper  function  designs/hero.tsx:12:1'";
    let config = CheckerConfig {
        type_check: sh(tsc),
        lint: sh(eslint),
        dead_code: sh(knip),
        ..CheckerConfig::default()
    };
    let pipeline = ValidationPipeline::new(dir.path(), dir.path()).with_config(config);

    let result = pipeline.validate(HERO, "hero.tsx").await;
    assert!(!result.success);

    assert_eq!(result.errors.len(), 1);
    let type_error = &result.errors[0];
    assert_eq!(type_error.kind, FindingKind::Type);
    assert_eq!(type_error.line, Some(4));
    assert_eq!(type_error.code.as_deref(), Some("TS2322"));

    let lint: Vec<_> = result
        .warnings
        .iter()
        .filter(|w| w.kind == FindingKind::Lint)
        .collect();
    assert_eq!(lint.len(), 1);
    assert_eq!(lint[0].severity, Severity::Warning);
    assert_eq!(lint[0].code.as_deref(), Some("no-unused-vars"));

    assert!(result
        .warnings
        .iter()
        .any(|w| w.kind == FindingKind::Deadcode && w.severity == Severity::Warning));
    assert_eq!(
        result.stage_status(ValidationStage::TypeCheck),
        Some(StageStatus::Failed)
    );
}

#[tokio::test]
async fn test_missing_package_skips_checkers() {
    let dir = project(r#""react": "^18.2.0""#);
    let marker = dir.path().join("checker-ran");
    let touch = format!("touch {}", marker.display());
    let config = CheckerConfig {
        type_check: sh(&touch),
        lint: sh(&touch),
        dead_code: sh(&touch),
        ..CheckerConfig::default()
    };
    let pipeline = ValidationPipeline::new(dir.path(), dir.path()).with_config(config);

    let source = "import { motion } from 'framer-motion';\nexport default () => <motion.div />;\n";
    let result = pipeline.validate(source, "anim.tsx").await;

    assert!(!result.success);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].message, "Missing dependency: framer-motion");
    assert_eq!(
        result.errors[0].suggestion.as_deref(),
        Some("Run: npm install framer-motion")
    );
    assert_eq!(
        result.stage_status(ValidationStage::Lint),
        Some(StageStatus::Skipped)
    );
    assert!(!marker.exists());
}
