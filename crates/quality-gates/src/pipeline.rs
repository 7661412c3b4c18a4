//! Validation Pipeline
//!
//! Validates one generated design file in two phases:
//! 1. Dependency check (in-process). Any error here short-circuits.
//! 2. Type check, lint and dead-code analysis, run concurrently via
//!    `futures_util::future::join3`.
//!
//! Findings are merged in stage order, then in emission order within a
//! stage. Checker launch failures never escape as `Err`: they become
//! findings so the caller always gets a `ValidationResult`.

use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use design_studio_core::CoreError;
use futures_util::future::join3;

use crate::config::{CheckerCommand, CheckerConfig};
use crate::dependency::check_dependencies;
use crate::models::{FindingKind, StageReport, ValidationError, ValidationResult, ValidationStage};
use crate::parsers::{DiagnosticParser, EslintParser, KnipParser, TscParser};
use crate::runner::run_checker;

// ============================================================================
// Staging
// ============================================================================

/// A source file written under the workspace for the duration of one run.
struct StagedSource {
    dir: PathBuf,
    path: PathBuf,
}

impl StagedSource {
    async fn write(root: &Path, staging_dir: &str, filename: &str, source: &str) -> std::io::Result<Self> {
        let name = plain_file_name(filename)?;
        let dir = root
            .join(staging_dir)
            .join(uuid::Uuid::new_v4().to_string());
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(name);
        tokio::fs::write(&path, source).await?;
        Ok(Self { dir, path })
    }

    async fn remove(self) {
        if let Err(e) = tokio::fs::remove_dir_all(&self.dir).await {
            tracing::warn!(dir = %self.dir.display(), error = %e, "Failed to remove staged source");
        }
    }
}

/// `filename` must be a single path component; anything else could land
/// outside the staging directory.
fn plain_file_name(filename: &str) -> std::io::Result<&Path> {
    let path = Path::new(filename);
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(path),
        _ => Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid design filename: {}", filename),
        )),
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Runs the validation stages for design files.
///
/// `workspace_root` is the preview project: it holds `package.json` and is
/// the working directory of every checker. `tooling_root` supplies a lint
/// config when the workspace has none.
#[derive(Debug, Clone)]
pub struct ValidationPipeline {
    workspace_root: PathBuf,
    tooling_root: PathBuf,
    config: CheckerConfig,
}

impl ValidationPipeline {
    pub fn new(workspace_root: impl Into<PathBuf>, tooling_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            tooling_root: tooling_root.into(),
            config: CheckerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CheckerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Validate `source` as if it were saved under `filename`.
    pub async fn validate(&self, source: &str, filename: &str) -> ValidationResult {
        let started = Instant::now();
        tracing::info!(filename, "Validating design");

        let dependency = {
            let t = Instant::now();
            let findings = check_dependencies(source, filename, &self.workspace_root).await;
            StageReport::ran(ValidationStage::Dependency, findings, elapsed_ms(t))
        };

        if dependency.has_errors() {
            tracing::info!(
                filename,
                errors = dependency.findings.len(),
                "Dependency check failed, skipping remaining stages"
            );
            return ValidationResult::from_reports(vec![
                dependency,
                StageReport::skipped(ValidationStage::TypeCheck),
                StageReport::skipped(ValidationStage::Lint),
                StageReport::skipped(ValidationStage::DeadCode),
            ]);
        }

        let staged = match StagedSource::write(
            &self.workspace_root,
            &self.config.staging_dir,
            filename,
            source,
        )
        .await
        {
            Ok(staged) => staged,
            Err(e) => {
                tracing::error!(filename, error = %e, "Failed to stage source for validation");
                let failure = ValidationError::error(
                    FindingKind::Type,
                    filename,
                    format!("Failed to stage source for validation: {}", e),
                );
                return ValidationResult::from_reports(vec![
                    dependency,
                    StageReport::ran(ValidationStage::TypeCheck, vec![failure], 0),
                    StageReport::skipped(ValidationStage::Lint),
                    StageReport::skipped(ValidationStage::DeadCode),
                ]);
            }
        };

        self.ensure_lint_config().await;

        let (type_check, lint, dead_code) = join3(
            self.run_stage(ValidationStage::TypeCheck, &self.config.type_check, &TscParser, &staged.path, filename),
            self.run_stage(ValidationStage::Lint, &self.config.lint, &EslintParser, &staged.path, filename),
            self.run_stage(ValidationStage::DeadCode, &self.config.dead_code, &KnipParser, &staged.path, filename),
        )
        .await;

        staged.remove().await;

        let result = ValidationResult::from_reports(vec![dependency, type_check, lint, dead_code]);
        tracing::info!(
            filename,
            success = result.success,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            duration_ms = elapsed_ms(started),
            "Validation finished"
        );
        result
    }

    async fn run_stage(
        &self,
        stage: ValidationStage,
        command: &CheckerCommand,
        parser: &dyn DiagnosticParser,
        staged: &Path,
        filename: &str,
    ) -> StageReport {
        if !command.enabled {
            return StageReport::skipped(stage);
        }
        let started = Instant::now();
        let kind = stage.finding_kind();

        let mut findings = match run_checker(command, &self.workspace_root, staged).await {
            Ok(output) => {
                let mut findings = parser.parse_diagnostics(&output);
                if findings.is_empty() && !output.succeeded() && stage != ValidationStage::DeadCode {
                    let detail = output.combined();
                    findings.push(ValidationError::error(
                        kind,
                        filename,
                        format!(
                            "{} exited with code {}: {}",
                            command.program,
                            output.exit_code.unwrap_or(-1),
                            detail.trim()
                        ),
                    ));
                }
                findings
            }
            Err(e) if stage == ValidationStage::DeadCode => {
                tracing::debug!(error = %e, "Dead code analysis unavailable");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(stage = %stage, error = %e, "Checker did not run");
                let detail = match &e {
                    CoreError::Command(message) => message.clone(),
                    other => other.to_string(),
                };
                vec![ValidationError::error(
                    kind,
                    filename,
                    format!("Failed to run {}: {}", checker_label(stage), detail),
                )]
            }
        };

        // Dead-code findings never block.
        if stage == ValidationStage::DeadCode {
            for finding in &mut findings {
                finding.severity = crate::models::Severity::Warning;
            }
        }

        StageReport::ran(stage, findings, elapsed_ms(started))
    }

    /// Copy the tooling lint config into the workspace if it has none.
    async fn ensure_lint_config(&self) {
        if !self.config.lint.enabled {
            return;
        }
        let name = &self.config.eslint_config_file;
        let target = self.workspace_root.join(name);
        if tokio::fs::metadata(&target).await.is_ok() {
            return;
        }
        let source = self.tooling_root.join(name);
        if tokio::fs::metadata(&source).await.is_err() {
            return;
        }
        match tokio::fs::copy(&source, &target).await {
            Ok(_) => tracing::debug!(target = %target.display(), "Copied lint config into workspace"),
            Err(e) => tracing::warn!(error = %e, "Failed to copy lint config"),
        }
    }
}

fn checker_label(stage: ValidationStage) -> &'static str {
    match stage {
        ValidationStage::Dependency => "dependency check",
        ValidationStage::TypeCheck => "type checker",
        ValidationStage::Lint => "linter",
        ValidationStage::DeadCode => "dead code analysis",
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Severity, StageStatus};
    use tempfile::TempDir;

    const CHART_SOURCE: &str = "import React from 'react';\nimport { LineChart } from 'charty';\nexport default function Hero() { return <div />; }\n";
    const PLAIN_SOURCE: &str = "import React from 'react';\nexport default function Hero() { return <div />; }\n";

    fn workspace() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"react": "^18.2.0"}}"#,
        )
        .unwrap();
        dir
    }

    fn sh(script: &str) -> CheckerCommand {
        CheckerCommand::new("sh", &["-c", script, "{file}"]).with_timeout(10)
    }

    fn quiet_config() -> CheckerConfig {
        CheckerConfig {
            type_check: sh("exit 0"),
            lint: sh("echo '[]'"),
            dead_code: sh("exit 0"),
            ..CheckerConfig::default()
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_dependency_short_circuits_checkers() {
        let dir = workspace();
        let config = CheckerConfig {
            type_check: sh("touch tsc-ran"),
            lint: sh("touch eslint-ran"),
            dead_code: sh("touch knip-ran"),
            ..CheckerConfig::default()
        };
        let pipeline = ValidationPipeline::new(dir.path(), dir.path()).with_config(config);

        let result = pipeline.validate(CHART_SOURCE, "hero.tsx").await;

        assert!(!result.success);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Missing dependency: charty");
        assert_eq!(result.errors[0].suggestion.as_deref(), Some("Run: npm install charty"));
        assert_eq!(result.stage_status(ValidationStage::TypeCheck), Some(StageStatus::Skipped));
        assert!(!dir.path().join("tsc-ran").exists());
        assert!(!dir.path().join("eslint-ran").exists());
        assert!(!dir.path().join("knip-ran").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_clean_source_passes_and_cleans_staging() {
        let dir = workspace();
        let pipeline = ValidationPipeline::new(dir.path(), dir.path()).with_config(quiet_config());

        let result = pipeline.validate(PLAIN_SOURCE, "hero.tsx").await;

        assert!(result.success, "{:?}", result.errors);
        assert!(result.errors.is_empty());
        assert_eq!(result.stages.len(), 4);
        let staging = dir.path().join("__validation__");
        let leftovers = std::fs::read_dir(&staging).map(|d| d.count()).unwrap_or(0);
        assert_eq!(leftovers, 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_checker_sees_staged_source() {
        let dir = workspace();
        let config = CheckerConfig {
            type_check: sh("cp \"$0\" seen.tsx"),
            ..quiet_config()
        };
        let pipeline = ValidationPipeline::new(dir.path(), dir.path()).with_config(config);

        pipeline.validate(PLAIN_SOURCE, "hero.tsx").await;

        let seen = std::fs::read_to_string(dir.path().join("seen.tsx")).unwrap();
        assert_eq!(seen, PLAIN_SOURCE);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_findings_merge_in_stage_order() {
        let dir = workspace();
        let config = CheckerConfig {
            type_check: sh("echo \"hero.tsx(2,3): error TS2304: Cannot find name 'Foo'.\"; exit 2"),
            lint: sh(r#"echo '[{"filePath":"hero.tsx","messages":[{"ruleId":"semi","severity":1,"message":"Missing semicolon.","line":1,"column":27},{"ruleId":"no-undef","severity":2,"message":"Foo is not defined.","line":2,"column":3}]}]'; exit 1"#),
            dead_code: sh("printf 'Unused exports (1):\\n./designs/hero.tsx\\n├─ Hero hero.tsx:3:17\\n'"),
            ..CheckerConfig::default()
        };
        let pipeline = ValidationPipeline::new(dir.path(), dir.path()).with_config(config);

        let result = pipeline.validate(PLAIN_SOURCE, "hero.tsx").await;

        assert!(!result.success);
        let errors: Vec<FindingKind> = result.errors.iter().map(|e| e.kind).collect();
        assert_eq!(errors, vec![FindingKind::Type, FindingKind::Lint]);
        let warnings: Vec<FindingKind> = result.warnings.iter().map(|e| e.kind).collect();
        assert_eq!(warnings, vec![FindingKind::Lint, FindingKind::Deadcode]);
        assert_eq!(result.errors[0].code.as_deref(), Some("TS2304"));
        assert!(result.warnings.iter().all(|w| w.severity == Severity::Warning));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_silent_nonzero_exit_becomes_finding() {
        let dir = workspace();
        let config = CheckerConfig {
            type_check: sh("echo 'error: no inputs' >&2; exit 1"),
            ..quiet_config()
        };
        let pipeline = ValidationPipeline::new(dir.path(), dir.path()).with_config(config);

        let result = pipeline.validate(PLAIN_SOURCE, "hero.tsx").await;
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("exited with code 1"));
        assert_eq!(result.errors[0].kind, FindingKind::Type);
    }

    #[tokio::test]
    async fn test_missing_checkers() {
        let dir = workspace();
        let missing = CheckerCommand::new("definitely-not-a-checker-xyz", &[]);
        let config = CheckerConfig {
            type_check: missing.clone(),
            lint: missing.clone(),
            dead_code: missing,
            ..CheckerConfig::default()
        };
        let pipeline = ValidationPipeline::new(dir.path(), dir.path()).with_config(config);

        let result = pipeline.validate(PLAIN_SOURCE, "hero.tsx").await;
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].message.starts_with("Failed to run type checker"));
        assert!(result.errors[1].message.starts_with("Failed to run linter"));
        assert!(result.warnings.is_empty());
    }

    fn disabled_config() -> CheckerConfig {
        CheckerConfig {
            type_check: CheckerCommand::new("x", &[]).disabled(),
            lint: CheckerCommand::new("x", &[]).disabled(),
            dead_code: CheckerCommand::new("x", &[]).disabled(),
            ..CheckerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_missing_checker_message_names_the_failure_once() {
        let dir = workspace();
        let config = CheckerConfig {
            type_check: CheckerCommand::new("definitely-not-a-checker-xyz", &[]),
            ..disabled_config()
        };
        let pipeline = ValidationPipeline::new(dir.path(), dir.path()).with_config(config);

        let result = pipeline.validate(PLAIN_SOURCE, "hero.tsx").await;
        let message = &result.errors[0].message;
        assert!(message.starts_with("Failed to run type checker: definitely-not-a-checker-xyz: "));
        assert_eq!(message.matches("Failed to run").count(), 1);
        assert!(!message.contains("Command error"));
    }

    #[tokio::test]
    async fn test_staging_stays_inside_workspace() {
        let dir = workspace();
        let outside = TempDir::new().unwrap();
        let victim = outside.path().join("victim.tsx");
        std::fs::write(&victim, "ORIGINAL").unwrap();
        let pipeline = ValidationPipeline::new(dir.path(), dir.path()).with_config(disabled_config());

        let absolute = victim.to_string_lossy().into_owned();
        for filename in [absolute.as_str(), "../../escaped.tsx", "nested/hero.tsx", ".."] {
            let result = pipeline.validate("export const x = 1;\n", filename).await;
            assert!(!result.success, "{} was accepted", filename);
            assert!(result.errors[0].message.contains("invalid design filename"));
        }

        assert_eq!(std::fs::read_to_string(&victim).unwrap(), "ORIGINAL");
        assert!(!dir.path().join("escaped.tsx").exists());
        assert!(!dir.path().parent().unwrap().join("escaped.tsx").exists());
        let staging = dir.path().join("__validation__");
        let leftovers = std::fs::read_dir(&staging).map(|d| d.count()).unwrap_or(0);
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_disabled_stages_are_skipped() {
        let dir = workspace();
        let config = CheckerConfig {
            type_check: CheckerCommand::new("x", &[]).disabled(),
            lint: CheckerCommand::new("x", &[]).disabled(),
            dead_code: CheckerCommand::new("x", &[]).disabled(),
            ..CheckerConfig::default()
        };
        let pipeline = ValidationPipeline::new(dir.path(), dir.path()).with_config(config);

        let result = pipeline.validate(PLAIN_SOURCE, "hero.tsx").await;
        assert!(result.success);
        assert_eq!(result.stage_status(ValidationStage::Lint), Some(StageStatus::Skipped));
        assert_eq!(result.stage_status(ValidationStage::Dependency), Some(StageStatus::Passed));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_lint_config_copied_from_tooling_root() {
        let dir = workspace();
        let tooling = TempDir::new().unwrap();
        std::fs::write(tooling.path().join(".eslintrc.js"), "module.exports = {};\n").unwrap();
        let pipeline = ValidationPipeline::new(dir.path(), tooling.path()).with_config(quiet_config());

        pipeline.validate(PLAIN_SOURCE, "hero.tsx").await;

        let copied = std::fs::read_to_string(dir.path().join(".eslintrc.js")).unwrap();
        assert_eq!(copied, "module.exports = {};\n");
    }
}
