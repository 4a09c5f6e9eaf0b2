//! Integration tests for Layer 2: Population
//!
//! Tests for registry assembly, specialization chains, and validation
//! against a population snapshot.

#[path = "../support/mod.rs"]
mod support;

mod exclusivity;
mod members;

use metrology_declaration::{Declaration, Definition, ProcessorOptions, process};
use metrology_population::{DeclarationTally, Population, Processed, assemble};

/// Processes declarations and assembles the snapshot validation reads.
pub fn snapshot(declarations: &[Declaration]) -> (Vec<Definition>, Population<Processed>) {
    let definitions: Vec<Definition> = declarations
        .iter()
        .filter_map(|d| process(d, &ProcessorOptions::default()).value().cloned())
        .collect();
    let tally = DeclarationTally::from_definitions(&definitions);
    let population = assemble(definitions.iter().cloned().collect(), &tally);
    (definitions, population)
}
