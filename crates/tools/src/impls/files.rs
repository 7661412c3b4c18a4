//! Design File Tools
//!
//! create / edit / rename / delete under `<workspace>/designs/`. Every
//! successful mutation is mirrored into the work tracker so `submit_work`
//! validates exactly what the turn touched.

use serde_json::json;

use crate::design_tool::{CreateFileArgs, DeleteFileArgs, EditFileArgs, RenameFileArgs};
use crate::executor::{ToolExecutionContext, ToolResult};
use crate::names::DESIGNS_DIR;

pub async fn create_file(ctx: &ToolExecutionContext, args: &CreateFileArgs) -> ToolResult {
    let designs_dir = ctx.workspace_root.join(DESIGNS_DIR);
    if let Err(e) = tokio::fs::create_dir_all(&designs_dir).await {
        return ToolResult::err(format!("Failed to create directories: {}", e));
    }

    let path = args.filename.path_in(&ctx.workspace_root);
    if let Err(e) = tokio::fs::write(&path, &args.code).await {
        return ToolResult::err(format!("Failed to write file: {}", e));
    }

    ctx.tracker
        .record_file_change(&ctx.turn_id, args.filename.as_str(), args.code.clone());
    tracing::info!(filename = %args.filename, bytes = args.code.len(), "Created design file");

    ToolResult::ok(format!(
        "File created: {} ({} lines)",
        args.filename,
        args.code.lines().count()
    ))
    .with_data(json!({ "filename": args.filename }))
}

pub async fn edit_file(ctx: &ToolExecutionContext, args: &EditFileArgs) -> ToolResult {
    let path = args.filename.path_in(&ctx.workspace_root);
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return ToolResult::err(format!("File not found: {}", args.filename))
        }
        Err(e) => return ToolResult::err(format!("Failed to read file: {}", e)),
    };

    if args.old_string.is_empty() {
        return ToolResult::err("old_string must not be empty");
    }

    let occurrences = content.matches(args.old_string.as_str()).count();
    if occurrences == 0 {
        return ToolResult::err(
            "String not found in file. The old_string must exist in the file.",
        );
    }
    if !args.replace_all && occurrences > 1 {
        return ToolResult::err(format!(
            "The old_string appears {} times in the file. Either provide more context to make it unique, or set replace_all to true.",
            occurrences
        ));
    }

    let new_content = if args.replace_all {
        content.replace(&args.old_string, &args.new_string)
    } else {
        content.replacen(&args.old_string, &args.new_string, 1)
    };

    if let Err(e) = tokio::fs::write(&path, &new_content).await {
        return ToolResult::err(format!("Failed to write file: {}", e));
    }

    ctx.tracker
        .record_file_change(&ctx.turn_id, args.filename.as_str(), new_content);
    tracing::info!(filename = %args.filename, occurrences, "Edited design file");

    let output = if args.replace_all {
        format!(
            "File updated: {} ({} occurrences replaced)",
            args.filename, occurrences
        )
    } else {
        format!("File updated: {}", args.filename)
    };
    ToolResult::ok(output).with_data(json!({ "filename": args.filename }))
}

pub async fn rename_file(ctx: &ToolExecutionContext, args: &RenameFileArgs) -> ToolResult {
    let old_path = args.old_filename.path_in(&ctx.workspace_root);
    let new_path = args.new_filename.path_in(&ctx.workspace_root);

    if tokio::fs::metadata(&new_path).await.is_ok() {
        return ToolResult::err(format!("File already exists: {}", args.new_filename));
    }
    if let Err(e) = tokio::fs::rename(&old_path, &new_path).await {
        return ToolResult::err(format!("Failed to rename file: {}", e));
    }

    let moved = ctx.tracker.rename_file(
        &ctx.turn_id,
        args.old_filename.as_str(),
        args.new_filename.as_str(),
    );
    if !moved {
        // Not written this turn, but the new name is still a change to validate.
        match tokio::fs::read_to_string(&new_path).await {
            Ok(source) => {
                ctx.tracker
                    .record_file_change(&ctx.turn_id, args.new_filename.as_str(), source)
            }
            Err(e) => {
                tracing::warn!(filename = %args.new_filename, error = %e, "Renamed file unreadable")
            }
        }
    }
    tracing::info!(from = %args.old_filename, to = %args.new_filename, "Renamed design file");

    ToolResult::ok(format!("File renamed to {}", args.new_filename)).with_data(json!({
        "oldFilename": args.old_filename,
        "newFilename": args.new_filename,
    }))
}

pub async fn delete_file(ctx: &ToolExecutionContext, args: &DeleteFileArgs) -> ToolResult {
    let path = args.filename.path_in(&ctx.workspace_root);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        return ToolResult::err(format!("Failed to delete file: {}", e));
    }

    ctx.tracker.forget_file(&ctx.turn_id, args.filename.as_str());
    tracing::info!(filename = %args.filename, "Deleted design file");

    ToolResult::ok(format!("File deleted: {}", args.filename))
        .with_data(json!({ "filename": args.filename }))
}
