//! Published results in `MessagePack`.
//!
//! A [`Snapshot`] is the flat, canonically ordered form of a compilation,
//! suitable for handing to an emitter in another process.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use metrology_foundation::{Diagnostic, Error, ErrorContext, ErrorKind, Result};
use metrology_population::{DeclarationTally, Population, Resolved, ValidatedDefinition, assemble};
use serde::{Deserialize, Serialize};

use crate::pipeline::Compilation;

/// Validated definitions and diagnostics of one pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Every published definition, units first, then scalars, vectors,
    /// vector groups, and group members, each by identity.
    pub definitions: Vec<ValidatedDefinition>,
    /// Every diagnostic, in canonical order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Snapshot {
    /// Flattens a compilation.
    #[must_use]
    pub fn from_compilation(compilation: &Compilation) -> Self {
        let population = compilation.population();
        let definitions = population
            .units()
            .values()
            .cloned()
            .map(ValidatedDefinition::Unit)
            .chain(population.scalars().values().cloned().map(ValidatedDefinition::Scalar))
            .chain(population.vectors().values().cloned().map(ValidatedDefinition::Vector))
            .chain(population.groups().values().cloned().map(ValidatedDefinition::Group))
            .chain(population.members().values().cloned().map(ValidatedDefinition::Member))
            .collect();

        Self {
            definitions,
            diagnostics: compilation.diagnostics().to_vec(),
        }
    }

    /// Rebuilds the published population.
    #[must_use]
    pub fn population(&self) -> Population<Resolved> {
        let tally: DeclarationTally = self
            .definitions
            .iter()
            .map(|d| (d.kind(), d.identity().clone(), d.location().clone()))
            .collect();
        assemble(self.definitions.iter().cloned().collect(), &tally)
    }
}

/// Serializes a snapshot to bytes using `MessagePack` format.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(snapshot: &Snapshot) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(snapshot)
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

/// Deserializes a snapshot from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_bytes(bytes: &[u8]) -> Result<Snapshot> {
    rmp_serde::from_slice(bytes)
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

/// Attaches the file and stage to an error.
fn in_file(error: Error, path: &Path, stage: &str) -> Error {
    error.with_context(
        ErrorContext::new()
            .with_source(path.display().to_string())
            .with_stage(stage),
    )
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> Error {
    Error::new(ErrorKind::IoError(format!(
        "failed to {action} '{}': {e}",
        path.display()
    )))
}

/// Saves a snapshot to a file, replacing any existing file.
///
/// Errors carry the path and the `save snapshot` stage as context.
///
/// # Errors
///
/// Returns an error if the file cannot be written or serialization fails.
pub fn save_to_file<P: AsRef<Path>>(snapshot: &Snapshot, path: P) -> Result<()> {
    let path = path.as_ref();
    let write = || -> Result<()> {
        let bytes = to_bytes(snapshot)?;
        let file = File::create(path).map_err(|e| io_error("create file", path, &e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&bytes)
            .map_err(|e| io_error("write to file", path, &e))?;
        writer.flush().map_err(|e| io_error("flush file", path, &e))
    };
    write().map_err(|e| in_file(e, path, "save snapshot"))
}

/// Loads a snapshot from a file.
///
/// Errors carry the path and the `load snapshot` stage as context.
///
/// # Errors
///
/// Returns an error if the file cannot be read or deserialization fails.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Snapshot> {
    let path = path.as_ref();
    let read = || -> Result<Snapshot> {
        let file = File::open(path).map_err(|e| io_error("open file", path, &e))?;
        let mut bytes = Vec::new();
        BufReader::new(file)
            .read_to_end(&mut bytes)
            .map_err(|e| io_error("read file", path, &e))?;
        from_bytes(&bytes)
    };
    read().map_err(|e| in_file(e, path, "load snapshot"))
}
