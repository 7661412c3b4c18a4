//! Orchestrator Integration Tests
//!
//! Full turns driven by a scripted model: tool calls, submission,
//! validation, injection, persistence and preview.

#![cfg(unix)]

use std::sync::Arc;
use tempfile::TempDir;

use design_studio::services::orchestrator::{Orchestrator, TurnOutcome};
use design_studio::services::preview::CURRENT_DESIGN;
use design_studio::AppState;
use design_studio_core::{BroadcastNotifier, StatusKind, StatusReporter};
use design_studio_llm::{LlmResponse, MessageContent};
use design_studio_quality_gates::FindingKind;
use design_studio_parser::collect_ids;

use super::common::{sh, test_config, tool_call, ScriptedProvider};

const HERO: &str = r#"export default function Hero() {
  return (
    <section className="hero">
      <h1>Build faster</h1>
      <button type="button">Start</button>
    </section>
  );
}
"#;

struct Setup {
    orchestrator: Orchestrator,
    provider: Arc<ScriptedProvider>,
    notifier: BroadcastNotifier,
    dir: TempDir,
}

fn setup(script: Vec<LlmResponse>, tweak: impl FnOnce(&mut design_studio::AppConfig)) -> Setup {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    tweak(&mut config);
    let provider = Arc::new(ScriptedProvider::new(script));
    let notifier = BroadcastNotifier::new(256);
    let state = AppState::new(
        config,
        provider.clone(),
        StatusReporter::new(Arc::new(notifier.clone())),
    );
    Setup {
        orchestrator: Orchestrator::new(Arc::new(state)),
        provider,
        notifier,
        dir,
    }
}

fn create_and_submit(code: &str) -> LlmResponse {
    LlmResponse::with_tools(
        "scripted-1",
        vec![
            tool_call(
                "call_1",
                "create_file",
                serde_json::json!({"filename": "hero.tsx", "location": "designs", "code": code}),
            ),
            tool_call("call_2", "submit_work", serde_json::json!({})),
        ],
    )
}

#[tokio::test]
async fn test_turn_persists_tagged_design_and_starts_preview() {
    let s = setup(vec![create_and_submit(HERO)], |_| {});
    let mut status = s.notifier.subscribe();

    let outcome = s.orchestrator.run_turn("turn-1", "Build a hero").await.unwrap();
    let files = match outcome {
        TurnOutcome::Submitted { files, .. } => files,
        other => panic!("unexpected outcome: {:?}", other),
    };
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].filename, "hero.tsx");
    assert_eq!(files[0].ids_added, 3);

    let designs = s.dir.path().join("workspace/designs");
    let persisted = std::fs::read_to_string(designs.join("hero.tsx")).unwrap();
    assert_eq!(
        collect_ids(&persisted).unwrap(),
        vec!["id_hero_0", "id_hero_1", "id_hero_2"]
    );
    assert_eq!(
        std::fs::read_to_string(designs.join(CURRENT_DESIGN)).unwrap(),
        persisted
    );

    let preview = s.orchestrator.state().preview();
    assert!(preview.is_running());
    assert_eq!(preview.status().port, Some(files[0].preview_port));

    let mut kinds = Vec::new();
    while let Ok(message) = status.try_recv() {
        kinds.push(message.status);
    }
    let order = [
        StatusKind::GenerationStart,
        StatusKind::ToolCallStart,
        StatusKind::ToolCallComplete,
        StatusKind::ValidationStart,
        StatusKind::ValidationComplete,
        StatusKind::PreviewStart,
        StatusKind::PreviewReady,
    ];
    let positions: Vec<usize> = order
        .iter()
        .map(|kind| kinds.iter().position(|k| k == kind).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    assert!(s
        .orchestrator
        .state()
        .tracker()
        .get_pending_work("turn-1")
        .is_none());
    preview.stop().await;
}

#[tokio::test]
async fn test_second_turn_edits_and_restarts_preview() {
    let s = setup(vec![create_and_submit(HERO)], |_| {});
    s.orchestrator.run_turn("turn-1", "Build a hero").await.unwrap();
    let first_port = s.orchestrator.state().preview().status().port;

    s.provider.push(LlmResponse::with_tools(
        "scripted-1",
        vec![
            tool_call(
                "call_3",
                "edit_file",
                serde_json::json!({
                    "filename": "hero.tsx",
                    "location": "designs",
                    "old_string": "Build faster",
                    "new_string": "Ship sooner"
                }),
            ),
            tool_call("call_4", "submit_work", serde_json::json!({})),
        ],
    ));
    let outcome = s.orchestrator.run_turn("turn-2", "Change the headline").await.unwrap();
    let files = match outcome {
        TurnOutcome::Submitted { files, .. } => files,
        other => panic!("unexpected outcome: {:?}", other),
    };
    // Identifiers from the first turn survive the edit
    assert_eq!(files[0].ids_added, 0);

    let persisted =
        std::fs::read_to_string(s.dir.path().join("workspace/designs/hero.tsx")).unwrap();
    assert!(persisted.contains("Ship sooner"));
    assert!(persisted.contains(r#"id="id_hero_1""#));

    let preview = s.orchestrator.state().preview();
    assert!(preview.is_running());
    assert!(first_port.is_some());
    preview.stop().await;
}

#[tokio::test]
async fn test_type_errors_fail_the_turn() {
    let tsc = "echo \"hero.tsx(3,5): error TS2304: Cannot find name 'Buton'.\"; exit 2";
    let s = setup(vec![create_and_submit(HERO)], |config| {
        config.checkers.type_check = sh(tsc);
    });

    let outcome = s.orchestrator.run_turn("turn-1", "Build a hero").await.unwrap();
    match outcome {
        TurnOutcome::ValidationFailed { filename, result } => {
            assert_eq!(filename, "hero.tsx");
            assert_eq!(result.errors[0].kind, FindingKind::Type);
            assert_eq!(result.error_summary(), "Cannot find name 'Buton'.");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(!s.orchestrator.state().preview().is_running());
}

#[tokio::test]
async fn test_preview_failure_is_reported() {
    let s = setup(vec![create_and_submit(HERO)], |config| {
        config.preview.args = vec!["-c".to_string(), "exit 7".to_string()];
    });

    let outcome = s.orchestrator.run_turn("turn-1", "Build a hero").await.unwrap();
    match outcome {
        TurnOutcome::PreviewFailed { filename, error } => {
            assert_eq!(filename, "hero.tsx");
            assert!(error.contains("exit code 7"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    // The design was still persisted before the preview attempt
    assert!(s.dir.path().join("workspace/designs/hero.tsx").exists());
}

#[tokio::test]
async fn test_failed_tool_result_goes_back_to_model() {
    let s = setup(
        vec![
            LlmResponse::with_tools(
                "scripted-1",
                vec![tool_call(
                    "call_1",
                    "delete_file",
                    serde_json::json!({"filename": "ghost.tsx", "location": "designs"}),
                )],
            ),
            LlmResponse::text("scripted-1", "There was nothing to delete."),
        ],
        |_| {},
    );

    let outcome = s.orchestrator.run_turn("turn-1", "Delete ghost").await.unwrap();
    assert_eq!(
        outcome,
        TurnOutcome::Answered {
            text: "There was nothing to delete.".to_string()
        }
    );

    let seen = s.provider.seen();
    assert_eq!(seen.len(), 2);
    let last = seen[1].last().unwrap();
    assert!(matches!(
        &last.content[0],
        MessageContent::ToolResult { is_error: Some(true), tool_use_id, .. } if tool_use_id == "call_1"
    ));
}
