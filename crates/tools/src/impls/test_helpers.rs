//! Shared test utilities for tool unit tests.

use std::path::Path;
use std::sync::Arc;

use crate::executor::{InstallCommand, ToolExecutionContext};
use crate::work_tracker::WorkTracker;

/// Context rooted at `dir` for both the workspace and the installer, with an
/// installer that always succeeds.
pub(crate) fn make_test_ctx(dir: &Path) -> ToolExecutionContext {
    ToolExecutionContext {
        turn_id: "turn-1".to_string(),
        workspace_root: dir.to_path_buf(),
        preview_root: dir.to_path_buf(),
        tracker: Arc::new(WorkTracker::new()),
        install: InstallCommand {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "exit 0".to_string(), "install".to_string()],
            timeout_secs: 10,
        },
    }
}
