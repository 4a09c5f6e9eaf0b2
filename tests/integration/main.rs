//! Cross-layer integration tests for Metrology
//!
//! Tests that run declarations through every layer and check the published
//! population and diagnostics.

#[path = "../support/mod.rs"]
mod support;

mod determinism;
mod properties;
