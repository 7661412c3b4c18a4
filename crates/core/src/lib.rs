//! Design Studio Core
//!
//! Foundational error and notification types for the Design Studio
//! workspace. This crate has no dependency on the model client, the checkers,
//! or the preview process.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `notify` - Progress notifications (`StatusMessage`, `StatusNotifier`, `StatusReporter`)

pub mod error;
pub mod notify;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Notifications ──────────────────────────────────────────────────────
pub use notify::{
    BroadcastNotifier, NoopNotifier, StatusKind, StatusMessage, StatusNotifier, StatusReporter,
};
