//! Status Notifications
//!
//! Progress messages emitted while a turn runs. The core never talks to a
//! transport directly; it calls a [`StatusNotifier`] and whichever surface is
//! attached (WebSocket bridge, SSE, CLI log) decides how to deliver them.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ============================================================================
// Message Types
// ============================================================================

/// Kind of progress update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    GenerationStart,
    GenerationThinking,
    GenerationComplete,
    ToolCallStart,
    ToolCallComplete,
    ToolCallError,
    ValidationStart,
    ValidationComplete,
    ValidationError,
    PreviewStart,
    PreviewReady,
    PreviewError,
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StatusKind::GenerationStart => "generation_start",
            StatusKind::GenerationThinking => "generation_thinking",
            StatusKind::GenerationComplete => "generation_complete",
            StatusKind::ToolCallStart => "tool_call_start",
            StatusKind::ToolCallComplete => "tool_call_complete",
            StatusKind::ToolCallError => "tool_call_error",
            StatusKind::ValidationStart => "validation_start",
            StatusKind::ValidationComplete => "validation_complete",
            StatusKind::ValidationError => "validation_error",
            StatusKind::PreviewStart => "preview_start",
            StatusKind::PreviewReady => "preview_ready",
            StatusKind::PreviewError => "preview_error",
        };
        write!(f, "{}", s)
    }
}

/// A single progress update tied to the turn that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessage {
    pub message_id: String,
    pub status: StatusKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    pub details: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl StatusMessage {
    pub fn new(message_id: impl Into<String>, status: StatusKind, details: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            status,
            tool: None,
            details: details.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }
}

// ============================================================================
// Notifier Trait & Implementations
// ============================================================================

/// Hook the core calls for every progress update.
#[async_trait]
pub trait StatusNotifier: Send + Sync {
    async fn notify(&self, message: StatusMessage);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl StatusNotifier for NoopNotifier {
    async fn notify(&self, _message: StatusMessage) {}
}

/// Fans updates out to any number of subscribers.
///
/// Sending with no live subscriber is not an error; the update is dropped.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<StatusMessage>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusMessage> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl StatusNotifier for BroadcastNotifier {
    async fn notify(&self, message: StatusMessage) {
        let _ = self.sender.send(message);
    }
}

// ============================================================================
// Reporter
// ============================================================================

/// Typed helpers over a notifier, one per status the pipeline emits.
#[derive(Clone)]
pub struct StatusReporter {
    notifier: Arc<dyn StatusNotifier>,
}

impl StatusReporter {
    pub fn new(notifier: Arc<dyn StatusNotifier>) -> Self {
        Self { notifier }
    }

    pub fn noop() -> Self {
        Self::new(Arc::new(NoopNotifier))
    }

    pub async fn send(&self, message: StatusMessage) {
        tracing::debug!(
            message_id = %message.message_id,
            status = %message.status,
            tool = message.tool.as_deref().unwrap_or("-"),
            "{}",
            message.details
        );
        self.notifier.notify(message).await;
    }

    pub async fn generation_start(&self, message_id: &str) {
        self.send(StatusMessage::new(message_id, StatusKind::GenerationStart, "Generating..."))
            .await;
    }

    pub async fn generation_thinking(&self, message_id: &str, step: usize) {
        self.send(StatusMessage::new(
            message_id,
            StatusKind::GenerationThinking,
            format!("Thinking (step {})...", step + 1),
        ))
        .await;
    }

    pub async fn generation_complete(&self, message_id: &str, text: &str) {
        self.send(StatusMessage::new(message_id, StatusKind::GenerationComplete, text))
            .await;
    }

    pub async fn tool_call_start(&self, message_id: &str, tool: &str, details: impl Into<String>) {
        self.send(StatusMessage::new(message_id, StatusKind::ToolCallStart, details).with_tool(tool))
            .await;
    }

    pub async fn tool_call_complete(&self, message_id: &str, tool: &str, details: impl Into<String>) {
        self.send(
            StatusMessage::new(message_id, StatusKind::ToolCallComplete, details).with_tool(tool),
        )
        .await;
    }

    pub async fn tool_call_error(&self, message_id: &str, tool: &str, error: impl Into<String>) {
        self.send(StatusMessage::new(message_id, StatusKind::ToolCallError, error).with_tool(tool))
            .await;
    }

    pub async fn validation_start(&self, message_id: &str, stage: &str) {
        self.send(StatusMessage::new(
            message_id,
            StatusKind::ValidationStart,
            format!("Running {}...", stage),
        ))
        .await;
    }

    pub async fn validation_complete(&self, message_id: &str) {
        self.send(StatusMessage::new(
            message_id,
            StatusKind::ValidationComplete,
            "All validations passed",
        ))
        .await;
    }

    pub async fn validation_error(&self, message_id: &str, details: impl Into<String>) {
        self.send(StatusMessage::new(message_id, StatusKind::ValidationError, details))
            .await;
    }

    pub async fn preview_start(&self, message_id: &str) {
        self.send(StatusMessage::new(
            message_id,
            StatusKind::PreviewStart,
            "Starting preview server...",
        ))
        .await;
    }

    pub async fn preview_ready(&self, message_id: &str, port: u16) {
        self.send(StatusMessage::new(
            message_id,
            StatusKind::PreviewReady,
            format!("Preview ready at http://localhost:{}", port),
        ))
        .await;
    }

    pub async fn preview_error(&self, message_id: &str, error: impl Into<String>) {
        self.send(StatusMessage::new(message_id, StatusKind::PreviewError, error))
            .await;
    }
}

impl std::fmt::Debug for StatusReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusReporter").finish_non_exhaustive()
    }
}
