//! Design Studio LLM
//!
//! Message and tool-schema types exchanged with the model client, the
//! `LlmProvider` trait the host implements, and request pacing.

pub mod provider;
pub mod queue;
pub mod types;

// Re-export main types
pub use provider::LlmProvider;
pub use queue::{PacedProvider, RequestQueue, DEFAULT_JITTER_MS, DEFAULT_MIN_INTERVAL_MS};
pub use types::*;
