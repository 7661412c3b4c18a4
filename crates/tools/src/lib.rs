//! Design Studio Tools
//!
//! The agent's tool set and the state it writes to:
//! - `WorkTracker` - per-turn ledger of written files and installed packages
//! - `DesignTool` / `ToolKind` - closed tool enum, argument schemas, dispatch
//! - `ToolResult` / `ToolExecutionContext` - executor result and context
//! - `names` - design filename and package-name contracts
//!
//! Executors never write outside `<workspace>/designs/`.

pub mod design_tool;
pub mod executor;
pub mod impls;
pub mod names;
pub mod work_tracker;

// Re-export core types
pub use design_tool::{
    tool_definitions, AddDependencyArgs, AskUserArgs, CreateFileArgs, DeleteFileArgs, DesignTool,
    EditFileArgs, Location, RenameFileArgs, ToolKind,
};
pub use executor::{InstallCommand, ToolExecutionContext, ToolResult};
pub use names::{validate_filename, DesignFilename, PackageName, DESIGNS_DIR, DESIGN_EXTENSION};
pub use work_tracker::{PendingWork, TrackedFile, WorkTracker};
