//! Resolution passes for Metrology.
//!
//! This crate provides:
//! - [`Pipeline`] - Runs processing, validation, and assembly over declarations
//! - [`PipelineConfig`] - Pass configuration
//! - [`CancellationToken`] - Cooperative cancellation between stages
//! - [`Compilation`] - The published population and its diagnostics
//! - [`snapshot`] - `MessagePack` snapshots of a compilation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cancel;
pub mod config;
pub mod pipeline;
pub mod snapshot;

pub use cancel::CancellationToken;
pub use config::PipelineConfig;
pub use pipeline::{Compilation, PassStats, Pipeline, compile};
pub use snapshot::Snapshot;
