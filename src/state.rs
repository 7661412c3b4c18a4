//! Application State
//!
//! Explicit context shared by every turn: configuration, the work tracker,
//! the validation pipeline, the preview manager, the status reporter and the
//! model client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use design_studio_core::StatusReporter;
use design_studio_llm::{LlmProvider, PacedProvider, RequestQueue, DEFAULT_JITTER_MS};
use design_studio_quality_gates::ValidationPipeline;
use design_studio_tools::{ToolExecutionContext, WorkTracker};

use crate::models::settings::AppConfig;
use crate::services::preview::PreviewManager;
use crate::utils::error::{AppError, AppResult};

/// Application state
pub struct AppState {
    config: AppConfig,
    tracker: Arc<WorkTracker>,
    pipeline: ValidationPipeline,
    preview: PreviewManager,
    reporter: StatusReporter,
    provider: Arc<dyn LlmProvider>,
    turn_in_flight: AtomicBool,
}

impl AppState {
    /// Build the state from a resolved configuration. The provider is paced
    /// when `agent.minRequestIntervalMs` is non-zero.
    pub fn new(config: AppConfig, provider: Arc<dyn LlmProvider>, reporter: StatusReporter) -> Self {
        let provider: Arc<dyn LlmProvider> = match config.agent.min_request_interval_ms {
            0 => provider,
            ms => Arc::new(PacedProvider::new(
                provider,
                RequestQueue::new(Duration::from_millis(ms), DEFAULT_JITTER_MS),
            )),
        };
        // Checkers run in the preview project, next to its package.json
        let pipeline = ValidationPipeline::new(&config.preview_root, &config.tooling_root)
            .with_config(config.checkers.clone());
        let preview = PreviewManager::new(
            config.preview.clone(),
            config.preview_root.clone(),
            &config.workspace_root,
        );
        Self {
            tracker: Arc::new(WorkTracker::new()),
            pipeline,
            preview,
            reporter,
            provider,
            turn_in_flight: AtomicBool::new(false),
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn tracker(&self) -> &Arc<WorkTracker> {
        &self.tracker
    }

    pub fn pipeline(&self) -> &ValidationPipeline {
        &self.pipeline
    }

    pub fn preview(&self) -> &PreviewManager {
        &self.preview
    }

    pub fn reporter(&self) -> &StatusReporter {
        &self.reporter
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Executor context for one turn.
    pub fn tool_context(&self, turn_id: &str) -> ToolExecutionContext {
        ToolExecutionContext {
            turn_id: turn_id.to_string(),
            workspace_root: self.config.workspace_root.clone(),
            preview_root: self.config.preview_root.clone(),
            tracker: self.tracker.clone(),
            install: self.config.install.clone(),
        }
    }

    /// Claim the single turn slot. Released when the guard drops.
    pub fn begin_turn(&self) -> AppResult<TurnGuard<'_>> {
        self.turn_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::Busy)?;
        Ok(TurnGuard {
            flag: &self.turn_in_flight,
        })
    }

    pub fn is_turn_in_flight(&self) -> bool {
        self.turn_in_flight.load(Ordering::Acquire)
    }
}

/// Holds the in-flight flag for the duration of a turn.
pub struct TurnGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
