//! Preview Manager
//!
//! Owns the preview dev server: a single child process moving through
//! `Stopped -> Starting -> Running`, with `Error` on failure. Every
//! transition is checked-and-set under one lock, and each start bumps a
//! generation counter so late events from a replaced child are ignored.

use chrono::{DateTime, Utc};
use design_studio_tools::{DesignFilename, DESIGNS_DIR, DESIGN_EXTENSION};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::{broadcast, oneshot, watch};
use tokio::time::timeout;

use super::logs::LogBuffer;
use super::port::find_available_port;
use super::process::{announced_port, is_ready_line, spawn_preview};
use super::types::{
    LogChannel, LogEntry, PreviewError, PreviewEvent, PreviewResult, PreviewState, PreviewStatus,
    StartOptions,
};
use crate::models::settings::PreviewConfig;

/// File the preview app renders.
pub const CURRENT_DESIGN: &str = "current.tsx";

const EVENT_CAPACITY: usize = 64;

/// What the readers and the monitor have seen of the child so far.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Readiness {
    Pending,
    /// Port announced on the readiness line, if any
    Ready(Option<u16>),
    Exited(Option<i32>),
}

struct ChildHandle {
    pid: Option<u32>,
    kill_tx: Option<oneshot::Sender<()>>,
    exited: watch::Receiver<bool>,
}

impl ChildHandle {
    fn signal(&self, force: bool) {
        #[cfg(unix)]
        {
            if let Some(pid) = self.pid {
                super::process::signal_group(pid, force);
            }
        }
        #[cfg(not(unix))]
        {
            let _ = force;
        }
    }

    fn kill_now(mut self) {
        self.signal(true);
        if let Some(tx) = self.kill_tx.take() {
            let _ = tx.send(());
        }
    }
}

struct Inner {
    state: PreviewState,
    port: Option<u16>,
    started_at: Option<DateTime<Utc>>,
    generation: u64,
    child: Option<ChildHandle>,
}

struct Shared {
    inner: Mutex<Inner>,
    logs: LogBuffer,
    events: broadcast::Sender<PreviewEvent>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn emit(&self, event: PreviewEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn note(&self, text: impl Into<String>) {
        let text = text.into();
        tracing::info!("[Preview] {}", text);
        self.logs.push(LogChannel::Stdout, text);
    }

    /// Child exited on its own. Only a running server of the current
    /// generation moves to `Error`.
    fn on_exit(&self, generation: u64, code: Option<i32>) {
        {
            let mut inner = self.lock();
            if inner.generation != generation || inner.state != PreviewState::Running {
                return;
            }
            inner.state = PreviewState::Error;
            inner.port = None;
            inner.started_at = None;
            inner.child = None;
        }
        let message = match code {
            Some(code) => format!("Preview server exited unexpectedly with code {}", code),
            None => "Preview server exited unexpectedly".to_string(),
        };
        tracing::error!("[Preview] {}", message);
        self.logs.push(LogChannel::Stderr, message.clone());
        self.emit(PreviewEvent::StateChange {
            state: PreviewState::Error,
        });
        self.emit(PreviewEvent::Error { message });
    }
}

/// Lifecycle manager for the preview dev server.
pub struct PreviewManager {
    config: PreviewConfig,
    preview_root: PathBuf,
    designs_dir: PathBuf,
    shared: Arc<Shared>,
}

impl PreviewManager {
    pub fn new(config: PreviewConfig, preview_root: PathBuf, workspace_root: &Path) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let logs = LogBuffer::new(config.log_capacity);
        Self {
            config,
            preview_root,
            designs_dir: workspace_root.join(DESIGNS_DIR),
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: PreviewState::Stopped,
                    port: None,
                    started_at: None,
                    generation: 0,
                    child: None,
                }),
                logs,
                events,
            }),
        }
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Start the server and wait until it reports readiness.
    pub async fn start(&self, opts: StartOptions) -> PreviewResult<PreviewStatus> {
        let generation = {
            let mut inner = self.shared.lock();
            if inner.state.is_active() {
                return Err(PreviewError::AlreadyActive { state: inner.state });
            }
            inner.state = PreviewState::Starting;
            inner.port = None;
            inner.started_at = None;
            inner.generation += 1;
            inner.generation
        };
        self.shared.emit(PreviewEvent::StateChange {
            state: PreviewState::Starting,
        });

        if let Some(name) = opts.design_name.as_deref() {
            self.load_design(name).await;
        }

        let shared = &self.shared;
        let port = find_available_port(self.config.port, self.config.max_port_attempts, |busy| {
            shared.note(format!(
                "Port {} is in use, trying {}...",
                busy,
                busy.saturating_add(1)
            ));
        })
        .await;
        let Some(port) = port else {
            return Err(self.fail(
                generation,
                PreviewError::PortExhausted {
                    start: self.config.port,
                    attempts: self.config.max_port_attempts,
                },
            ));
        };

        tracing::info!(
            "[Preview] Starting {} on port {} in {}",
            self.config.program,
            port,
            self.preview_root.display()
        );
        let mut child = match spawn_preview(&self.config, &self.preview_root, port) {
            Ok(child) => child,
            Err(e) => {
                return Err(self.fail(
                    generation,
                    PreviewError::ProcessError(format!(
                        "Failed to spawn {}: {}",
                        self.config.program, e
                    )),
                ));
            }
        };

        let (ready_tx, mut ready_rx) = watch::channel(Readiness::Pending);
        let ready_tx = Arc::new(ready_tx);
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(read_lines(
                stdout,
                LogChannel::Stdout,
                self.shared.clone(),
                ready_tx.clone(),
            ));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(read_lines(
                stderr,
                LogChannel::Stderr,
                self.shared.clone(),
                ready_tx.clone(),
            ));
        }

        let pid = child.id();
        let (kill_tx, kill_rx) = oneshot::channel();
        let (exited_tx, exited_rx) = watch::channel(false);
        tokio::spawn(monitor(
            child,
            kill_rx,
            exited_tx,
            ready_tx,
            self.shared.clone(),
            generation,
        ));

        let handle = ChildHandle {
            pid,
            kill_tx: Some(kill_tx),
            exited: exited_rx,
        };
        {
            let mut inner = self.shared.lock();
            if inner.generation != generation {
                drop(inner);
                handle.kill_now();
                return Err(PreviewError::ProcessError(
                    "Preview start was cancelled".to_string(),
                ));
            }
            inner.child = Some(handle);
            inner.port = Some(port);
        }

        let secs = self.config.startup_timeout_secs;
        let outcome = match timeout(
            Duration::from_secs(secs),
            ready_rx.wait_for(|r| *r != Readiness::Pending),
        )
        .await
        {
            Ok(Ok(readiness)) => Some((*readiness).clone()),
            Ok(Err(_)) => Some(Readiness::Exited(None)),
            Err(_) => None,
        };

        match outcome {
            None => Err(self.fail(generation, PreviewError::StartupTimeout { secs })),
            Some(Readiness::Exited(code)) => {
                let detail = code
                    .map(|c| format!("exit code {}", c))
                    .unwrap_or_else(|| "no exit code".to_string());
                Err(self.fail(
                    generation,
                    PreviewError::ProcessError(format!(
                        "Preview server exited before becoming ready ({})",
                        detail
                    )),
                ))
            }
            Some(Readiness::Pending) => Err(self.fail(
                generation,
                PreviewError::ProcessError("Preview server output closed".to_string()),
            )),
            Some(Readiness::Ready(announced)) => {
                let port = announced.unwrap_or(port);
                {
                    let mut inner = self.shared.lock();
                    if inner.generation != generation {
                        return Err(PreviewError::ProcessError(
                            "Preview start was cancelled".to_string(),
                        ));
                    }
                    inner.state = PreviewState::Running;
                    inner.port = Some(port);
                    inner.started_at = Some(Utc::now());
                }
                tracing::info!("[Preview] Ready at http://localhost:{}", port);
                self.shared.emit(PreviewEvent::StateChange {
                    state: PreviewState::Running,
                });
                self.shared.emit(PreviewEvent::Ready { port });
                Ok(self.status())
            }
        }
    }

    /// Stop the server. Does nothing when already stopped.
    pub async fn stop(&self) {
        let (generation, child) = {
            let mut inner = self.shared.lock();
            if inner.state == PreviewState::Stopped {
                return;
            }
            inner.generation += 1;
            (inner.generation, inner.child.take())
        };
        tracing::info!("[Preview] Stopping preview server");
        self.shared.emit(PreviewEvent::Stopping);

        if let Some(child) = child {
            self.terminate(child).await;
        }

        {
            let mut inner = self.shared.lock();
            if inner.generation == generation {
                inner.state = PreviewState::Stopped;
                inner.port = None;
                inner.started_at = None;
            }
        }
        self.shared.emit(PreviewEvent::StateChange {
            state: PreviewState::Stopped,
        });
        self.shared.emit(PreviewEvent::Stopped);
    }

    pub async fn restart(&self, opts: StartOptions) -> PreviewResult<PreviewStatus> {
        self.stop().await;
        self.start(opts).await
    }

    pub fn status(&self) -> PreviewStatus {
        let inner = self.shared.lock();
        PreviewStatus {
            state: inner.state,
            port: inner.port,
            url: inner.port.map(|port| format!("http://localhost:{}", port)),
            uptime_secs: inner
                .started_at
                .map(|t| (Utc::now() - t).num_seconds().max(0) as u64),
            started_at: inner.started_at,
        }
    }

    pub fn state(&self) -> PreviewState {
        self.shared.lock().state
    }

    pub fn is_running(&self) -> bool {
        self.state() == PreviewState::Running
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.shared.logs.snapshot()
    }

    pub fn clear_logs(&self) {
        self.shared.logs.clear();
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PreviewEvent> {
        self.shared.events.subscribe()
    }

    /// Copy `designs/<name>.tsx` over `designs/current.tsx`. Failures are
    /// logged and never abort the start.
    async fn load_design(&self, name: &str) {
        let stem = name.strip_suffix(DESIGN_EXTENSION).unwrap_or(name);
        let filename = match DesignFilename::parse(format!("{}{}", stem, DESIGN_EXTENSION)) {
            Ok(filename) => filename,
            Err(e) => {
                self.shared
                    .note(format!("Failed to load design: {}: {}", name, e));
                return;
            }
        };
        let source = self.designs_dir.join(filename.as_str());
        if !source.exists() {
            self.shared
                .note(format!("Design file not found: {}", filename));
            return;
        }
        match tokio::fs::copy(&source, self.designs_dir.join(CURRENT_DESIGN)).await {
            Ok(_) => self.shared.note(format!("Loaded design: {}", filename)),
            Err(e) => self.shared.note(format!("Failed to load design: {}", e)),
        }
    }

    /// Move to `Error` if `generation` is still current, kill the child and
    /// announce the failure.
    fn fail(&self, generation: u64, err: PreviewError) -> PreviewError {
        let child = {
            let mut inner = self.shared.lock();
            if inner.generation != generation {
                return err;
            }
            inner.state = PreviewState::Error;
            inner.port = None;
            inner.started_at = None;
            inner.child.take()
        };
        if let Some(child) = child {
            child.kill_now();
        }
        let message = err.to_string();
        tracing::error!("[Preview] {}", message);
        self.shared.logs.push(LogChannel::Stderr, message.clone());
        self.shared.emit(PreviewEvent::StateChange {
            state: PreviewState::Error,
        });
        self.shared.emit(PreviewEvent::Error { message });
        err
    }

    /// SIGTERM the group, wait out the grace period, then SIGKILL.
    async fn terminate(&self, mut child: ChildHandle) {
        child.signal(false);
        #[cfg(not(unix))]
        {
            if let Some(tx) = child.kill_tx.take() {
                let _ = tx.send(());
            }
        }

        let grace = Duration::from_secs(self.config.stop_grace_secs);
        let exited = matches!(timeout(grace, child.exited.wait_for(|e| *e)).await, Ok(Ok(_)));
        if !exited {
            tracing::warn!("[Preview] Process did not exit after SIGTERM, sending SIGKILL");
            child.signal(true);
            if let Some(tx) = child.kill_tx.take() {
                let _ = tx.send(());
            }
            let _ = timeout(grace, child.exited.wait_for(|e| *e)).await;
        }
    }
}

impl Drop for PreviewManager {
    fn drop(&mut self) {
        let child = self.shared.lock().child.take();
        if let Some(child) = child {
            child.kill_now();
        }
    }
}

async fn read_lines<R>(
    stream: R,
    channel: LogChannel,
    shared: Arc<Shared>,
    ready_tx: Arc<watch::Sender<Readiness>>,
) where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("[Preview:{:?}] Output closed: {}", channel, e);
                break;
            }
        }
        // Output is not guaranteed to be UTF-8.
        let line = String::from_utf8_lossy(&buf)
            .trim_end_matches(['\n', '\r'])
            .to_string();
        tracing::debug!("[Preview:{:?}] {}", channel, line);
        if is_ready_line(&line) {
            let announced = announced_port(&line);
            ready_tx.send_if_modified(|readiness| {
                if *readiness == Readiness::Pending {
                    *readiness = Readiness::Ready(announced);
                    true
                } else {
                    false
                }
            });
        }
        shared.logs.push(channel, line);
    }
}

/// Waits for the child (or a kill request) and reports the exit.
async fn monitor(
    mut child: Child,
    kill_rx: oneshot::Receiver<()>,
    exited_tx: watch::Sender<bool>,
    ready_tx: Arc<watch::Sender<Readiness>>,
    shared: Arc<Shared>,
    generation: u64,
) {
    let status = tokio::select! {
        status = child.wait() => status.ok(),
        Ok(()) = kill_rx => {
            let _ = child.start_kill();
            child.wait().await.ok()
        }
    };
    let code = status.and_then(|s| s.code());
    tracing::debug!("[Preview] Process exited with {:?}", code);

    ready_tx.send_if_modified(|readiness| {
        if *readiness == Readiness::Pending {
            *readiness = Readiness::Exited(code);
            true
        } else {
            false
        }
    });
    let _ = exited_tx.send(true);
    shared.on_exit(generation, code);
}
