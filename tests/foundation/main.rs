//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: TypeIdentity, SourceLocation, Diagnostic, Outcome,
//! Error, and persistent collections.

mod diagnostics;
mod errors;
