//! Orchestrator Service
//!
//! Coordinates model calls with tool execution in a bounded agentic loop,
//! then validates, injects, persists and previews whatever the turn wrote.

use std::collections::HashSet;
use std::sync::Arc;

use design_studio_llm::{LlmRequestOptions, Message, ToolCall, UsageStats};
use design_studio_parser::inject;
use design_studio_tools::{
    tool_definitions, DesignFilename, DesignTool, ToolExecutionContext, ToolResult,
};

use super::outcome::{SubmittedFile, TurnOutcome};
use crate::services::preview::StartOptions;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// Runs turns against the shared [`AppState`].
#[derive(Clone)]
pub struct Orchestrator {
    state: Arc<AppState>,
}

impl Orchestrator {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Run one user turn to completion.
    ///
    /// Only one turn may be in flight; a second caller gets
    /// [`AppError::Busy`]. Whatever the outcome, the turn's tracker entry is
    /// cleared before returning.
    pub async fn run_turn(&self, turn_id: &str, user_prompt: &str) -> AppResult<TurnOutcome> {
        let _guard = self.state.begin_turn()?;
        tracing::info!(turn_id, "Starting turn");
        self.state.reporter().generation_start(turn_id).await;

        let result = self.agent_loop(turn_id, user_prompt).await;
        self.state.tracker().clear(turn_id);

        match &result {
            Ok(outcome) => tracing::info!(turn_id, success = outcome.is_success(), "Turn finished"),
            Err(e) => tracing::error!(turn_id, error = %e, "Turn aborted"),
        }
        result
    }

    async fn agent_loop(&self, turn_id: &str, user_prompt: &str) -> AppResult<TurnOutcome> {
        let agent = &self.state.config().agent;
        let reporter = self.state.reporter();
        let tools = tool_definitions();
        let system = Some(agent.system_prompt.clone());
        let options = LlmRequestOptions {
            temperature: agent.temperature,
            max_tokens: agent.max_tokens,
            stream: false,
        };
        let ctx = self.state.tool_context(turn_id);

        let mut messages = vec![Message::user(user_prompt)];
        let mut usage = UsageStats::default();
        let mut last_text: Option<String> = None;

        for iteration in 0..agent.max_iterations {
            reporter
                .generation_thinking(turn_id, iteration as usize)
                .await;

            let response = self
                .state
                .provider()
                .send_message(messages.clone(), system.clone(), tools.clone(), options.clone())
                .await?;
            usage.accumulate(&response.usage);
            if let Some(text) = response.content.as_deref().filter(|t| !t.trim().is_empty()) {
                last_text = Some(text.to_string());
            }

            if !response.has_tool_calls() {
                let text = response.content.unwrap_or_default();
                tracing::debug!(
                    turn_id,
                    input_tokens = usage.input_tokens,
                    output_tokens = usage.output_tokens,
                    "Model answered without tools"
                );
                reporter.generation_complete(turn_id, &text).await;
                return Ok(TurnOutcome::Answered { text });
            }

            messages.push(Message::assistant_tool_calls(
                response.content.as_deref(),
                &response.tool_calls,
            ));

            let mut submitted = false;
            for call in &response.tool_calls {
                let (tool, result) = self.run_tool_call(turn_id, &ctx, call).await?;
                messages.push(Message::tool_result(
                    &call.id,
                    result.to_content(),
                    !result.success,
                ));
                if tool.is_submit() && result.success {
                    submitted = true;
                    break;
                }
            }

            if submitted {
                tracing::info!(
                    turn_id,
                    iterations = iteration + 1,
                    total_tokens = usage.total_tokens(),
                    "Work submitted"
                );
                return self.submit(turn_id, last_text).await;
            }
        }

        tracing::warn!(
            turn_id,
            max_iterations = agent.max_iterations,
            "Iteration limit reached without submission"
        );
        Ok(TurnOutcome::IterationLimit {
            iterations: agent.max_iterations,
            last_text,
        })
    }

    /// Parse, dispatch and report one tool call. Schema failures and unknown
    /// tools are returned as `Err` and abort the turn.
    async fn run_tool_call(
        &self,
        turn_id: &str,
        ctx: &ToolExecutionContext,
        call: &ToolCall,
    ) -> AppResult<(DesignTool, ToolResult)> {
        let reporter = self.state.reporter();
        let parsed = DesignTool::parse(&call.name, call.arguments.clone());

        let start_message = match &parsed {
            Ok(tool) => tool.start_message(),
            Err(_) => format!("Calling {}...", call.name),
        };
        reporter
            .tool_call_start(turn_id, &call.name, start_message)
            .await;

        let tool = match parsed {
            Ok(tool) => tool,
            Err(e) => {
                tracing::warn!(turn_id, tool = %call.name, error = %e, "Rejected tool call");
                reporter
                    .tool_call_error(turn_id, &call.name, e.to_string())
                    .await;
                return Err(e.into());
            }
        };

        let result = tool.execute(ctx).await;
        let message = tool.complete_message(&result);
        if result.success {
            reporter
                .tool_call_complete(turn_id, &call.name, message)
                .await;
        } else {
            tracing::debug!(turn_id, tool = %call.name, "Tool reported failure: {}", message);
            reporter.tool_call_error(turn_id, &call.name, message).await;
        }
        Ok((tool, result))
    }

    /// Validate, inject, persist and preview every file the turn recorded.
    pub async fn process_submission(&self, turn_id: &str) -> AppResult<TurnOutcome> {
        self.submit(turn_id, None).await
    }

    async fn submit(&self, turn_id: &str, final_text: Option<String>) -> AppResult<TurnOutcome> {
        let outcome = self.submit_pending(turn_id, final_text).await;
        self.state.tracker().clear(turn_id);
        outcome
    }

    async fn submit_pending(
        &self,
        turn_id: &str,
        final_text: Option<String>,
    ) -> AppResult<TurnOutcome> {
        let reporter = self.state.reporter();
        let work = self.state.tracker().get_pending_work(turn_id).unwrap_or_default();
        if work.files.is_empty() {
            tracing::warn!(turn_id, "Submission with no recorded files");
        }

        let mut files = Vec::with_capacity(work.files.len());
        for tracked in work.files.values() {
            reporter.validation_start(turn_id, "validation").await;
            let result = self
                .state
                .pipeline()
                .validate(&tracked.source, &tracked.filename)
                .await;
            if !result.success {
                reporter
                    .validation_error(turn_id, result.error_summary())
                    .await;
                return Ok(TurnOutcome::ValidationFailed {
                    filename: tracked.filename.clone(),
                    result,
                });
            }

            let filename =
                DesignFilename::parse(tracked.filename.clone()).map_err(AppError::validation)?;
            let injection = inject(&tracked.source, &HashSet::new(), filename.stem())?;
            let path = filename.path_in(&self.state.config().workspace_root);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, &injection.rewritten_source).await?;
            tracing::info!(
                turn_id,
                filename = %filename,
                added = injection.added,
                duplicates = injection.duplicates_found,
                "Persisted design"
            );
            reporter.validation_complete(turn_id).await;

            reporter.preview_start(turn_id).await;
            let preview = self.state.preview();
            let opts = StartOptions::design(filename.stem());
            let started = if preview.is_running() {
                preview.restart(opts).await
            } else {
                preview.start(opts).await
            };
            match started {
                Ok(status) => {
                    let port = status.port.unwrap_or(self.state.config().preview.port);
                    reporter.preview_ready(turn_id, port).await;
                    files.push(SubmittedFile {
                        filename: filename.to_string(),
                        ids_added: injection.added,
                        duplicates_found: injection.duplicates_found,
                        preview_port: port,
                    });
                }
                Err(e) => {
                    let error = e.to_string();
                    reporter.preview_error(turn_id, error.clone()).await;
                    return Ok(TurnOutcome::PreviewFailed {
                        filename: filename.to_string(),
                        error,
                    });
                }
            }
        }

        Ok(TurnOutcome::Submitted { final_text, files })
    }
}
