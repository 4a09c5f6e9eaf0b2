//! Type identities, diagnostics, and persistent collections for Metrology.
//!
//! This crate provides:
//! - [`TypeIdentity`] - Globally unique key of a declared type
//! - [`SourceLocation`] - Where a declaration or property was written
//! - [`Diagnostic`] - Problems reported against declarations
//! - [`Validity`] and [`Outcome`] - Accumulating check results
//! - [`Error`] - API-level errors with context
//! - [`PersistentMap`] - Persistent ordered map for registries

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod diagnostic;
pub mod error;
pub mod identity;
pub mod kind;
pub mod location;
pub mod outcome;

pub use collections::PersistentMap;
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity, sort_canonically};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use identity::TypeIdentity;
pub use kind::QuantityKind;
pub use location::{SourceLocation, Span};
pub use outcome::{Outcome, Validity};
