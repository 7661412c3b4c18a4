//! Design Tool Set
//!
//! The closed set of tools the agent may call. A raw `(name, arguments)` pair
//! from the model is parsed into a [`DesignTool`] before anything runs; an
//! unknown name or arguments that fail the schema become `CoreError`s, which
//! abort the turn. Dispatch is an exhaustive match, so a new tool is a
//! compile-checked change.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use design_studio_core::{CoreError, CoreResult};
use design_studio_llm::{ParameterSchema, ToolDefinition};

use crate::executor::{ToolExecutionContext, ToolResult};
use crate::impls;
use crate::names::{DesignFilename, PackageName, FILENAME_PATTERN, PACKAGE_NAME_PATTERN};

// ============================================================================
// Tool Kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    CreateFile,
    EditFile,
    RenameFile,
    DeleteFile,
    AddDependency,
    SubmitWork,
    AskUser,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::CreateFile,
        ToolKind::EditFile,
        ToolKind::RenameFile,
        ToolKind::DeleteFile,
        ToolKind::AddDependency,
        ToolKind::SubmitWork,
        ToolKind::AskUser,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::CreateFile => "create_file",
            ToolKind::EditFile => "edit_file",
            ToolKind::RenameFile => "rename_file",
            ToolKind::DeleteFile => "delete_file",
            ToolKind::AddDependency => "add_dependency",
            ToolKind::SubmitWork => "submit_work",
            ToolKind::AskUser => "ask_user",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::CreateFile => "Create a new design file with the provided code",
            ToolKind::EditFile => {
                "Modify an existing design file by replacing an exact string. old_string must be unique in the file unless replace_all is true"
            }
            ToolKind::RenameFile => "Rename an existing design file",
            ToolKind::DeleteFile => "Delete an existing design file",
            ToolKind::AddDependency => "Add an npm package to the preview environment",
            ToolKind::SubmitWork => {
                "Signal that all work is complete and trigger the validation pipeline. This tool takes no arguments - the system automatically tracks files created/modified and dependencies added during this turn."
            }
            ToolKind::AskUser => {
                "Request clarification from the user before continuing. Use this when you need more information to proceed with the task."
            }
        }
    }

    pub fn parameters_schema(&self) -> ParameterSchema {
        let filename =
            || ParameterSchema::string_pattern(Some("Kebab-case file name ending in .tsx"), FILENAME_PATTERN);
        let location = || {
            ParameterSchema::string_enum(
                Some("Files can only live in the designs/ directory"),
                &["designs"],
            )
        };

        let (properties, required): (Vec<(&str, ParameterSchema)>, Vec<&str>) = match self {
            ToolKind::CreateFile => (
                vec![
                    ("filename", filename()),
                    ("location", location()),
                    (
                        "code",
                        ParameterSchema::string(Some(
                            "Complete TypeScript React code to write to the file",
                        )),
                    ),
                ],
                vec!["filename", "location", "code"],
            ),
            ToolKind::EditFile => (
                vec![
                    ("filename", filename()),
                    ("location", location()),
                    (
                        "old_string",
                        ParameterSchema::string(Some("The exact string to replace")),
                    ),
                    (
                        "new_string",
                        ParameterSchema::string(Some("The string to replace it with")),
                    ),
                    (
                        "replace_all",
                        ParameterSchema::boolean(Some("Replace all occurrences (default: false)")),
                    ),
                ],
                vec!["filename", "location", "old_string", "new_string"],
            ),
            ToolKind::RenameFile => (
                vec![("old_filename", filename()), ("new_filename", filename())],
                vec!["old_filename", "new_filename"],
            ),
            ToolKind::DeleteFile => (
                vec![("filename", filename()), ("location", location())],
                vec!["filename", "location"],
            ),
            ToolKind::AddDependency => (
                vec![
                    (
                        "package_name",
                        ParameterSchema::string_pattern(Some("npm package name"), PACKAGE_NAME_PATTERN),
                    ),
                    (
                        "version",
                        ParameterSchema::string(Some(
                            "Version range (e.g., \"^5.0.0\"). If omitted, latest stable is used",
                        )),
                    ),
                ],
                vec!["package_name"],
            ),
            ToolKind::SubmitWork => (vec![], vec![]),
            ToolKind::AskUser => (
                vec![
                    (
                        "question",
                        ParameterSchema::string(Some("The question to ask the user")),
                    ),
                    (
                        "context",
                        ParameterSchema::string(Some("Why this question is needed")),
                    ),
                    (
                        "suggestions",
                        ParameterSchema::array(
                            Some("Suggested answers the user can click"),
                            ParameterSchema::string(None),
                        ),
                    ),
                ],
                vec!["question", "context"],
            ),
        };

        let properties: HashMap<String, ParameterSchema> = properties
            .into_iter()
            .map(|(name, schema)| (name.to_string(), schema))
            .collect();
        ParameterSchema::object(
            Some(self.description()),
            properties,
            required.into_iter().map(str::to_string).collect(),
        )
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.parameters_schema(),
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Definitions for every tool, in a stable order.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    ToolKind::ALL.iter().map(ToolKind::definition).collect()
}

// ============================================================================
// Arguments
// ============================================================================

/// The single directory design tools may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "designs")]
    Designs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFileArgs {
    pub filename: DesignFilename,
    pub location: Location,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditFileArgs {
    pub filename: DesignFilename,
    pub location: Location,
    #[serde(alias = "oldString")]
    pub old_string: String,
    #[serde(alias = "newString")]
    pub new_string: String,
    #[serde(default, alias = "replaceAll")]
    pub replace_all: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameFileArgs {
    #[serde(alias = "oldFilename")]
    pub old_filename: DesignFilename,
    #[serde(alias = "newFilename")]
    pub new_filename: DesignFilename,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFileArgs {
    pub filename: DesignFilename,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddDependencyArgs {
    #[serde(alias = "packageName")]
    pub package_name: PackageName,
    #[serde(default)]
    pub version: Option<String>,
}

impl AddDependencyArgs {
    /// `name` or `name@version`
    pub fn spec(&self) -> String {
        match self.version.as_deref().filter(|v| !v.trim().is_empty()) {
            Some(version) => format!("{}@{}", self.package_name, version.trim()),
            None => self.package_name.to_string(),
        }
    }

    pub fn version_label(&self) -> &str {
        self.version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("latest")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitWorkArgs {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskUserArgs {
    pub question: String,
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

// ============================================================================
// Parsed Tool Call
// ============================================================================

/// A tool call whose name and arguments have passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignTool {
    CreateFile(CreateFileArgs),
    EditFile(EditFileArgs),
    RenameFile(RenameFileArgs),
    DeleteFile(DeleteFileArgs),
    AddDependency(AddDependencyArgs),
    SubmitWork,
    AskUser(AskUserArgs),
}

fn parse_args<T: serde::de::DeserializeOwned>(kind: ToolKind, arguments: Value) -> CoreResult<T> {
    // Some providers send `null` for argument-less calls.
    let arguments = if arguments.is_null() {
        Value::Object(Default::default())
    } else {
        arguments
    };
    serde_json::from_value(arguments)
        .map_err(|e| CoreError::validation(format!("Invalid arguments for {}: {}", kind, e)))
}

impl DesignTool {
    /// Validate a raw tool call from the model.
    pub fn parse(name: &str, arguments: Value) -> CoreResult<Self> {
        let kind = ToolKind::from_name(name)
            .ok_or_else(|| CoreError::not_found(format!("Unknown tool: {}", name)))?;
        Ok(match kind {
            ToolKind::CreateFile => DesignTool::CreateFile(parse_args(kind, arguments)?),
            ToolKind::EditFile => DesignTool::EditFile(parse_args(kind, arguments)?),
            ToolKind::RenameFile => DesignTool::RenameFile(parse_args(kind, arguments)?),
            ToolKind::DeleteFile => DesignTool::DeleteFile(parse_args(kind, arguments)?),
            ToolKind::AddDependency => DesignTool::AddDependency(parse_args(kind, arguments)?),
            ToolKind::SubmitWork => {
                let _: SubmitWorkArgs = parse_args(kind, arguments)?;
                DesignTool::SubmitWork
            }
            ToolKind::AskUser => DesignTool::AskUser(parse_args(kind, arguments)?),
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            DesignTool::CreateFile(_) => ToolKind::CreateFile,
            DesignTool::EditFile(_) => ToolKind::EditFile,
            DesignTool::RenameFile(_) => ToolKind::RenameFile,
            DesignTool::DeleteFile(_) => ToolKind::DeleteFile,
            DesignTool::AddDependency(_) => ToolKind::AddDependency,
            DesignTool::SubmitWork => ToolKind::SubmitWork,
            DesignTool::AskUser(_) => ToolKind::AskUser,
        }
    }

    pub fn is_submit(&self) -> bool {
        matches!(self, DesignTool::SubmitWork)
    }

    /// Progress text shown when the call starts.
    pub fn start_message(&self) -> String {
        match self {
            DesignTool::CreateFile(args) => format!("Creating {}...", args.filename),
            DesignTool::EditFile(args) => format!("Editing {}...", args.filename),
            DesignTool::RenameFile(args) => {
                format!("Renaming {} to {}...", args.old_filename, args.new_filename)
            }
            DesignTool::DeleteFile(args) => format!("Deleting {}...", args.filename),
            DesignTool::AddDependency(args) => format!("Installing {}...", args.package_name),
            DesignTool::SubmitWork => "Submitting work for validation...".to_string(),
            DesignTool::AskUser(args) => format!("Asking user: {}", args.question),
        }
    }

    /// Progress text shown when the call finishes.
    pub fn complete_message(&self, result: &ToolResult) -> String {
        let error = result.error.as_deref().unwrap_or("Unknown error");
        match (self, result.success) {
            (DesignTool::CreateFile(args), true) => format!("File created: {}", args.filename),
            (DesignTool::CreateFile(_), false) => format!("Failed to create file: {}", error),
            (DesignTool::EditFile(args), true) => format!("File updated: {}", args.filename),
            (DesignTool::EditFile(_), false) => format!("Failed to edit file: {}", error),
            (DesignTool::RenameFile(args), true) => {
                format!("File renamed to {}", args.new_filename)
            }
            (DesignTool::RenameFile(_), false) => format!("Failed to rename file: {}", error),
            (DesignTool::DeleteFile(args), true) => format!("File deleted: {}", args.filename),
            (DesignTool::DeleteFile(_), false) => format!("Failed to delete file: {}", error),
            (DesignTool::AddDependency(args), true) => format!(
                "Package {}@{} installed successfully",
                args.package_name,
                args.version_label()
            ),
            (DesignTool::AddDependency(_), false) => {
                format!("Failed to install package: {}", error)
            }
            (DesignTool::SubmitWork, true) => "Work submitted successfully".to_string(),
            (DesignTool::SubmitWork, false) => format!("Work submission failed: {}", error),
            (DesignTool::AskUser(_), _) => "Waiting for user response".to_string(),
        }
    }

    /// Run the tool. Filesystem and installer failures come back as a failed
    /// `ToolResult`, never as `Err`.
    pub async fn execute(&self, ctx: &ToolExecutionContext) -> ToolResult {
        tracing::debug!(tool = %self.kind(), turn_id = %ctx.turn_id, "Executing tool");
        match self {
            DesignTool::CreateFile(args) => impls::files::create_file(ctx, args).await,
            DesignTool::EditFile(args) => impls::files::edit_file(ctx, args).await,
            DesignTool::RenameFile(args) => impls::files::rename_file(ctx, args).await,
            DesignTool::DeleteFile(args) => impls::files::delete_file(ctx, args).await,
            DesignTool::AddDependency(args) => impls::dependency::add_dependency(ctx, args).await,
            DesignTool::SubmitWork => impls::interaction::submit_work(),
            DesignTool::AskUser(args) => impls::interaction::ask_user(args),
        }
    }
}
