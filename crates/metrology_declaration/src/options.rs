//! Configuration for the per-declaration processor.

use metrology_foundation::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for [`process`](crate::processor::process).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcessorOptions {
    /// Smallest accepted vector dimension.
    pub min_vector_dimension: u32,

    /// Largest accepted vector dimension.
    pub max_vector_dimension: u32,

    /// Emit advisory diagnostics when a type name suggests a dimension.
    pub name_dimension_heuristics: bool,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            min_vector_dimension: 2,
            max_vector_dimension: 16,
            name_dimension_heuristics: true,
        }
    }
}

impl ProcessorOptions {
    /// Creates options with the name heuristics turned off.
    #[must_use]
    pub fn quiet() -> Self {
        Self {
            name_dimension_heuristics: false,
            ..Self::default()
        }
    }

    /// Builder method to set the accepted dimension range.
    #[must_use]
    pub fn with_dimension_range(mut self, min: u32, max: u32) -> Self {
        self.min_vector_dimension = min;
        self.max_vector_dimension = max;
        self
    }

    /// Builder method to enable/disable name heuristics.
    #[must_use]
    pub fn with_name_dimension_heuristics(mut self, enabled: bool) -> Self {
        self.name_dimension_heuristics = enabled;
        self
    }

    /// Returns true if `dimension` is in the accepted range.
    #[must_use]
    pub fn accepts_dimension(&self, dimension: i64) -> bool {
        (i64::from(self.min_vector_dimension)..=i64::from(self.max_vector_dimension))
            .contains(&dimension)
    }

    /// Checks that the options are consistent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the minimum dimension is zero or exceeds
    /// the maximum.
    pub fn validate(&self) -> Result<()> {
        if self.min_vector_dimension == 0 {
            return Err(Error::invalid_config(
                "minimum vector dimension must be at least 1",
            ));
        }
        if self.min_vector_dimension > self.max_vector_dimension {
            return Err(Error::invalid_config(format!(
                "minimum vector dimension {} exceeds maximum {}",
                self.min_vector_dimension, self.max_vector_dimension
            )));
        }
        Ok(())
    }
}
