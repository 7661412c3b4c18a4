//! Checker Runner
//!
//! Runs one external checker with a timeout and captures its output.

use design_studio_core::{CoreError, CoreResult};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::config::CheckerCommand;
use crate::parsers::CheckerOutput;

/// Run `command` in `cwd` with `{file}` bound to `file`.
///
/// A non-zero exit is not an error here; callers decide what it means.
pub async fn run_checker(command: &CheckerCommand, cwd: &Path, file: &Path) -> CoreResult<CheckerOutput> {
    let mut cmd = Command::new(&command.program);
    cmd.args(command.render_args(file))
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::debug!(command = %command.display(), cwd = %cwd.display(), "Running checker");

    match tokio::time::timeout(command.timeout(), cmd.output()).await {
        Ok(Ok(output)) => Ok(CheckerOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
        }),
        Ok(Err(e)) => Err(CoreError::command(format!("{}: {}", command.program, e))),
        Err(_) => Err(CoreError::timeout(command.display(), command.timeout_secs)),
    }
}
