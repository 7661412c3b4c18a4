//! JSON Configuration Management
//!
//! Handles reading and writing the application configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{ensure_dir, resolve_against, WORKSPACE_DIR_ENV};

/// Configuration service for managing app settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: AppConfig,
}

impl ConfigService {
    /// Load from an explicit path. A missing file yields defaults and is not
    /// created.
    pub fn load(path: impl Into<PathBuf>) -> AppResult<Self> {
        let config_path = path.into();
        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            AppConfig::default()
        };
        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<AppConfig> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting
    fn save_to_file(path: &Path, config: &AppConfig) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// Effective configuration: `WORKSPACE_DIR` overrides the workspace
    /// root, and relative roots are resolved against `base`.
    pub fn resolved(&self, base: &Path) -> AppConfig {
        let override_dir = std::env::var(WORKSPACE_DIR_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());
        resolve_config(self.config.clone(), override_dir.as_deref(), base)
    }

    /// Update the configuration with a partial update
    pub fn update_config(&mut self, update: SettingsUpdate) -> AppResult<AppConfig> {
        self.config.apply_update(update);
        self.save()?;
        Ok(self.config.clone())
    }

    /// Save the current configuration to disk
    fn save(&self) -> AppResult<()> {
        Self::save_to_file(&self.config_path, &self.config)
    }

    /// Reset configuration to defaults
    pub fn reset(&mut self) -> AppResult<()> {
        self.config = AppConfig::default();
        self.save()?;
        Ok(())
    }
}

fn resolve_config(mut config: AppConfig, workspace_override: Option<&str>, base: &Path) -> AppConfig {
    if let Some(dir) = workspace_override {
        config.workspace_root = PathBuf::from(dir);
    }
    config.workspace_root = resolve_against(base, &config.workspace_root);
    config.preview_root = resolve_against(base, &config.preview_root);
    config.tooling_root = resolve_against(base, &config.tooling_root);
    config
}
