//! Type registries and cross-population validation for Metrology.
//!
//! This crate provides:
//! - [`Population`] - Five disjoint registries with resolved specialization chains
//! - [`DeclarationTally`] - Declaration counts used for exclusivity checks
//! - [`Validator`] - Checks a definition against a population snapshot
//! - [`resolve_default_unit`] - Default unit resolution against a unit's instances

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod default_unit;
pub mod population;
pub mod stage;
pub mod tally;
pub mod validator;

pub use default_unit::resolve_default_unit;
pub use population::{ChainFault, Partition, Population, assemble};
pub use stage::{Entry, GroupMember, Processed, Resolved, Stage, Validated, ValidatedDefinition};
pub use tally::{DeclarationTally, Tallied, TallyEntry};
pub use validator::{Validator, validate};
