//! Preview Process Manager
//!
//! Runs the dev server that renders `designs/current.tsx`:
//! - `manager` - state machine, readiness detection, stop/restart
//! - `port` - linear port probing on 127.0.0.1
//! - `process` - process-group spawn and signalling
//! - `logs` - bounded log buffer

pub mod logs;
pub mod manager;
pub mod port;
pub mod process;
pub mod types;

pub use logs::LogBuffer;
pub use manager::{PreviewManager, CURRENT_DESIGN};
pub use port::{find_available_port, is_port_available};
pub use types::{
    LogChannel, LogEntry, PreviewError, PreviewEvent, PreviewResult, PreviewState, PreviewStatus,
    StartOptions,
};
