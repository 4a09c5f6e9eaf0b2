//! Configuration for resolution passes.

use metrology_declaration::ProcessorOptions;
use metrology_foundation::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a [`Pipeline`](crate::Pipeline).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Process and validate on the rayon thread pool.
    pub parallel: bool,

    /// Upper bound on validation rounds; 0 derives it from the input size.
    pub max_rounds: usize,

    /// Options for the per-declaration processor.
    pub processor: ProcessorOptions,

    /// Treat warnings as failures when judging a compilation.
    pub warnings_as_errors: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            max_rounds: 0,
            processor: ProcessorOptions::default(),
            warnings_as_errors: false,
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration that runs on the calling thread only.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Creates a configuration where any warning fails the compilation.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            warnings_as_errors: true,
            ..Self::default()
        }
    }

    /// Builder method to enable/disable parallel stages.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builder method to bound validation rounds.
    #[must_use]
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Builder method to set processor options.
    #[must_use]
    pub fn with_processor(mut self, processor: ProcessorOptions) -> Self {
        self.processor = processor;
        self
    }

    /// Builder method to enable/disable treating warnings as errors.
    #[must_use]
    pub fn with_warnings_as_errors(mut self, strict: bool) -> Self {
        self.warnings_as_errors = strict;
        self
    }

    /// Returns the round bound for a pass over `definitions` definitions.
    ///
    /// Every round but the last removes at least one definition, so
    /// `definitions + 1` rounds always reach the fixpoint.
    #[must_use]
    pub fn round_limit(&self, definitions: usize) -> usize {
        if self.max_rounds == 0 {
            definitions + 1
        } else {
            self.max_rounds
        }
    }

    /// Checks that the configuration is consistent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the processor options are inconsistent.
    pub fn validate(&self) -> Result<()> {
        self.processor
            .validate()
            .map_err(|e| Error::invalid_config(format!("processor: {e}")))
    }
}
