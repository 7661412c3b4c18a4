//! Request Pacing
//!
//! Spaces consecutive model calls so bursts of tool-loop iterations do not
//! trip provider rate limits. Each call waits for the remainder of the
//! minimum interval since the previous call, plus a random jitter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::provider::LlmProvider;
use crate::types::{LlmRequestOptions, LlmResponse, LlmResult, Message, ToolDefinition};

/// Default minimum gap between two calls.
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 1000;
/// Default jitter range added on top of the gap.
pub const DEFAULT_JITTER_MS: (u64, u64) = (500, 1500);

#[derive(Debug)]
pub struct RequestQueue {
    min_interval: Duration,
    jitter_ms: (u64, u64),
    last_request: Mutex<Option<Instant>>,
}

impl RequestQueue {
    pub fn new(min_interval: Duration, jitter_ms: (u64, u64)) -> Self {
        let (lo, hi) = jitter_ms;
        Self {
            min_interval,
            jitter_ms: (lo.min(hi), lo.max(hi)),
            last_request: Mutex::new(None),
        }
    }

    /// No spacing at all.
    pub fn unpaced() -> Self {
        Self::new(Duration::ZERO, (0, 0))
    }

    /// How long a call issued now would wait.
    fn wait_for(&self, last: Option<Instant>) -> Duration {
        let base = match last {
            Some(at) => self.min_interval.saturating_sub(at.elapsed()),
            None => Duration::ZERO,
        };
        let (lo, hi) = self.jitter_ms;
        let jitter = if hi == 0 {
            0
        } else {
            rand::thread_rng().gen_range(lo..=hi)
        };
        base + Duration::from_millis(jitter)
    }

    /// Wait for this caller's slot. Holding the lock across the sleep keeps
    /// calls strictly serialized.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let wait = self.wait_for(*last);
        if !wait.is_zero() {
            tracing::debug!(wait_ms = wait.as_millis() as u64, "Pacing model request");
            tokio::time::sleep(wait).await;
        }
        *last = Some(Instant::now());
    }
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_MIN_INTERVAL_MS),
            DEFAULT_JITTER_MS,
        )
    }
}

/// Wraps a provider so every call goes through a [`RequestQueue`].
pub struct PacedProvider {
    inner: Arc<dyn LlmProvider>,
    queue: RequestQueue,
}

impl PacedProvider {
    pub fn new(inner: Arc<dyn LlmProvider>, queue: RequestQueue) -> Self {
        Self { inner, queue }
    }
}

#[async_trait]
impl LlmProvider for PacedProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        tools: Vec<ToolDefinition>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        self.queue.acquire().await;
        self.inner
            .send_message(messages, system, tools, request_options)
            .await
    }
}
