//! Quantity declarations and per-declaration processing for Metrology.
//!
//! This crate provides:
//! - [`Declaration`] - Raw declarations of units, scalars, vectors, vector groups, and group members
//! - [`Property`] - Three-state raw properties (default, null, set)
//! - [`Definition`] - Locally checked, typed definitions
//! - [`process`] - The per-declaration processor
//! - [`ProcessorOptions`] - Processor configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod declaration;
pub mod definition;
pub mod options;
pub mod processor;
pub mod property;

pub use declaration::{
    CastProperties, Declaration, InheritanceProperties, QuantityProperties, ScalarDeclaration,
    SpecializedScalarDeclaration, SpecializedVectorDeclaration, SpecializedVectorGroupDeclaration,
    UnitDeclaration, UnitInstanceDeclaration, VectorDeclaration, VectorGroupDeclaration,
    VectorGroupMemberDeclaration,
};
pub use definition::{
    Casts, ConversionOperatorBehaviour, DefaultUnit, Definition, GroupBase, GroupDefinition,
    Inheritance, MemberDefinition, Origin, QuantityBase, QuantityDefinition, QuantityOptions,
    Reference, ScalarBase, ScalarDefinition, Specialization, UnitDefinition, UnitInstance,
    VectorBase, VectorDefinition,
};
pub use options::ProcessorOptions;
pub use processor::process;
pub use property::Property;
