//! Metrology - Declaration resolution for physical-quantity types
//!
//! This crate re-exports all layers of the Metrology system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: metrology_pipeline    - Passes, configuration, cancellation, snapshots
//! Layer 2: metrology_population  - Registries, specialization chains, validation
//! Layer 1: metrology_declaration - Declarations, definitions, per-declaration processing
//! Layer 0: metrology_foundation  - Core types (TypeIdentity, Diagnostic, Outcome, Error)
//! ```

pub use metrology_declaration as declaration;
pub use metrology_foundation as foundation;
pub use metrology_pipeline as pipeline;
pub use metrology_population as population;
