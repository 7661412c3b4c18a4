//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Environment variable that overrides the configured workspace root.
pub const WORKSPACE_DIR_ENV: &str = "WORKSPACE_DIR";

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Design Studio directory (~/.design-studio/)
pub fn design_studio_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".design-studio"))
}

/// Get the config file path (~/.design-studio/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(design_studio_dir()?.join("config.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
