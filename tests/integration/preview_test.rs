//! Preview Server Integration Tests

#![cfg(unix)]

use std::time::Duration;
use tempfile::TempDir;

use design_studio::services::preview::{
    PreviewEvent, PreviewManager, PreviewState, StartOptions, CURRENT_DESIGN,
};

use super::common::{sh_preview, READY_SCRIPT};

fn manager(script: &str) -> (PreviewManager, TempDir) {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("designs")).unwrap();
    let manager = PreviewManager::new(sh_preview(script), dir.path().to_path_buf(), dir.path());
    (manager, dir)
}

#[tokio::test]
async fn test_lifecycle_with_design_switch() {
    let (manager, dir) = manager(READY_SCRIPT);
    let designs = dir.path().join("designs");
    std::fs::write(designs.join("pricing.tsx"), "export default () => <table />;").unwrap();
    std::fs::write(designs.join("hero.tsx"), "export default () => <h1 />;").unwrap();
    let mut events = manager.subscribe();

    let status = manager.start(StartOptions::design("pricing")).await.unwrap();
    assert_eq!(status.state, PreviewState::Running);
    let port = status.port.unwrap();
    assert_eq!(status.url.as_deref(), Some(format!("http://localhost:{}", port).as_str()));
    assert!(std::fs::read_to_string(designs.join(CURRENT_DESIGN))
        .unwrap()
        .contains("<table />"));

    let status = manager.restart(StartOptions::design("hero")).await.unwrap();
    assert_eq!(status.state, PreviewState::Running);
    assert!(std::fs::read_to_string(designs.join(CURRENT_DESIGN))
        .unwrap()
        .contains("<h1 />"));

    manager.stop().await;
    assert_eq!(manager.state(), PreviewState::Stopped);

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    let ready = seen
        .iter()
        .filter(|e| matches!(e, PreviewEvent::Ready { .. }))
        .count();
    assert_eq!(ready, 2);
    assert_eq!(seen.last(), Some(&PreviewEvent::Stopped));

    let logs = manager.logs();
    assert!(logs.iter().any(|e| e.text == "starting dev server"));
    assert!(logs.iter().any(|e| e.text == "Loaded design: hero.tsx"));
}

#[tokio::test]
async fn test_stop_kills_whole_process_group() {
    // The server forks a grandchild that would outlive a plain kill
    let script = "sleep 30 & echo \"Local: http://localhost:$PORT/\"; wait";
    let (manager, dir) = manager(script);
    let status = manager.start(StartOptions::default()).await.unwrap();
    assert_eq!(status.state, PreviewState::Running);

    let started = std::time::Instant::now();
    manager.stop().await;
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(manager.status().port, None);
    drop(dir);
}
