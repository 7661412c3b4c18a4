//! Child process plumbing for the preview server.

use regex::Regex;
use std::path::Path;
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::process::{Child, Command};

use crate::models::settings::PreviewConfig;

/// Spawn the dev server in its own process group so it can be stopped as a
/// whole (npm, node and any watchers it forks).
pub(crate) fn spawn_preview(config: &PreviewConfig, cwd: &Path, port: u16) -> std::io::Result<Child> {
    let mut std_cmd = std::process::Command::new(&config.program);
    std_cmd
        .args(config.render_args(port))
        .current_dir(cwd)
        .env("PORT", port.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        std_cmd.process_group(0);
    }

    let mut cmd = Command::from(std_cmd);
    cmd.kill_on_drop(true);
    cmd.spawn()
}

/// Signal the process group led by `pid`.
#[cfg(unix)]
pub(crate) fn signal_group(pid: u32, force: bool) {
    let signal = if force { libc::SIGKILL } else { libc::SIGTERM };
    let pgid = pid as i32;
    // SAFETY: kill(2) with a negative pid only sends a signal; a stale pgid
    // yields ESRCH, which is ignored.
    unsafe {
        libc::kill(-pgid, signal);
    }
}

/// Readiness marker printed by the dev server.
pub(crate) fn is_ready_line(line: &str) -> bool {
    line.contains("ready") || line.contains("Local:")
}

fn port_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r":(\d+)").ok()).as_ref()
}

/// Port announced on a readiness line, e.g. `Local: http://localhost:3003/`.
pub(crate) fn announced_port(line: &str) -> Option<u16> {
    port_regex()?
        .captures(line)
        .and_then(|caps| caps[1].parse().ok())
}
