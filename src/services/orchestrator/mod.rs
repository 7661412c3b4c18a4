//! Tool-Call Orchestrator
//!
//! Drives one user turn: the model/tool loop, then the submission pipeline
//! (validate, inject, persist, preview) for the files the turn wrote.

pub mod outcome;
pub mod service;

pub use outcome::{SubmittedFile, TurnOutcome};
pub use service::Orchestrator;
