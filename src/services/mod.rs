//! Services
//!
//! Long-lived services owned by `AppState`.

pub mod orchestrator;
pub mod preview;
