//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use design_studio::models::settings::{AppConfig, PreviewConfig};
use design_studio_llm::{
    LlmError, LlmProvider, LlmRequestOptions, LlmResponse, LlmResult, Message, ToolCall,
    ToolDefinition,
};
use design_studio_quality_gates::{CheckerCommand, CheckerConfig};

/// Prints a readiness line carrying the port it was given, then idles.
pub const READY_SCRIPT: &str =
    "echo starting dev server; echo \"  Local:   http://localhost:$PORT/\"; exec sleep 30";

pub fn sh(script: &str) -> CheckerCommand {
    CheckerCommand::new("sh", &["-c", script]).with_timeout(10)
}

/// Checkers that all pass silently.
pub fn passing_checkers() -> CheckerConfig {
    CheckerConfig {
        type_check: sh("exit 0"),
        lint: sh("echo '[]'"),
        dead_code: sh("exit 0"),
        ..CheckerConfig::default()
    }
}

pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
    listener.local_addr().unwrap().port()
}

pub fn sh_preview(script: &str) -> PreviewConfig {
    PreviewConfig {
        port: free_port(),
        max_port_attempts: 5,
        startup_timeout_secs: 10,
        stop_grace_secs: 1,
        log_capacity: 100,
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
    }
}

/// Config rooted in `root` with stand-in checkers and preview server.
pub fn test_config(root: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.workspace_root = root.join("workspace");
    config.preview_root = root.join("preview");
    config.tooling_root = root.to_path_buf();
    config.checkers = passing_checkers();
    config.preview = sh_preview(READY_SCRIPT);
    config.agent.min_request_interval_ms = 0;
    std::fs::create_dir_all(config.workspace_root.join("designs")).unwrap();
    std::fs::create_dir_all(&config.preview_root).unwrap();
    config
}

pub fn tool_call(id: &str, name: &str, arguments: serde_json::Value) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments,
    }
}

/// Model stand-in that replays a fixed script of responses.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<LlmResponse>>,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<LlmResponse>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, response: LlmResponse) {
        self.script.lock().unwrap().push_back(response);
    }

    /// Histories sent on each call.
    pub fn seen(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-1"
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        _system: Option<String>,
        _tools: Vec<ToolDefinition>,
        _request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        self.seen.lock().unwrap().push(messages);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::Other {
                message: "script exhausted".to_string(),
            })
    }
}
