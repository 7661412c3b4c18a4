//! Integration Tests Module
//!
//! End-to-end tests across the workspace crates: validation with stand-in
//! checkers, identifier injection, the preview lifecycle, and full turns
//! driven by a scripted model.

// Shared fixtures
mod common;

// Validation pipeline with stand-in checkers
mod validation_test;

// Identifier injection through the public API
mod injection_test;

// Preview server lifecycle
mod preview_test;

// Full turns through the orchestrator
mod orchestrator_test;

// Saved configuration
mod config_test;
