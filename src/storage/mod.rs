//! Storage Layer
//!
//! Persists the JSON application config.

pub mod config;

pub use config::*;
