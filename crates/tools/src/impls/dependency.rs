//! add_dependency
//!
//! Installs a package into the preview project with the configured
//! installer and records it for the turn.

use serde_json::json;
use std::process::Stdio;
use tokio::process::Command;

use crate::design_tool::AddDependencyArgs;
use crate::executor::{ToolExecutionContext, ToolResult};

/// Keep installer output short enough to hand back to the model.
const MAX_ERROR_OUTPUT_CHARS: usize = 2000;

fn tail(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    let skip = count - max_chars;
    match text.char_indices().nth(skip) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

pub async fn add_dependency(ctx: &ToolExecutionContext, args: &AddDependencyArgs) -> ToolResult {
    let spec = args.spec();
    let install = &ctx.install;

    let mut cmd = Command::new(&install.program);
    cmd.args(&install.args)
        .arg(&spec)
        .current_dir(&ctx.preview_root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::info!(package = %spec, program = %install.program, "Installing dependency");

    let output = match tokio::time::timeout(install.timeout(), cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return ToolResult::err(format!("Failed to run {}: {}", install.program, e));
        }
        Err(_) => {
            return ToolResult::err(format!(
                "Installing {} timed out after {}s",
                spec, install.timeout_secs
            ));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let detail = if stderr.trim().is_empty() { stdout } else { stderr };
        tracing::warn!(package = %spec, status = ?output.status.code(), "Dependency install failed");
        return ToolResult::err(format!(
            "Command failed with exit code {}: {}",
            output.status.code().unwrap_or(-1),
            tail(detail.trim(), MAX_ERROR_OUTPUT_CHARS)
        ));
    }

    ctx.tracker
        .record_dependency(&ctx.turn_id, args.package_name.as_str());

    ToolResult::ok(format!(
        "Package {}@{} installed successfully",
        args.package_name,
        args.version_label()
    ))
    .with_data(json!({
        "packageName": args.package_name,
        "version": args.version_label(),
    }))
}
