//! LLM Provider Trait
//!
//! The model client is owned by the host application. The orchestrator only
//! needs one capability from it: given the history and the tool set, return
//! the next response.

use async_trait::async_trait;

use super::types::{LlmRequestOptions, LlmResponse, LlmResult, Message, ToolDefinition};

/// Trait that model clients implement.
///
/// Retries and authentication are the implementor's concern.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &str;

    /// Returns the current model being used.
    fn model(&self) -> &str;

    /// Send the conversation and get a complete response.
    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        tools: Vec<ToolDefinition>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse>;
}
