//! Quantity kinds.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The five registries a declared type can belong to.
///
/// Specialized declarations share the kind of the quantity they specialize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum QuantityKind {
    /// A unit of measurement.
    Unit,
    /// A scalar quantity.
    Scalar,
    /// A vector quantity of fixed dimension.
    Vector,
    /// A group of vector quantities sharing a unit.
    VectorGroup,
    /// A vector of fixed dimension belonging to a vector group.
    VectorGroupMember,
}

impl QuantityKind {
    /// All kinds, in registry order.
    pub const ALL: [Self; 5] = [
        Self::Unit,
        Self::Scalar,
        Self::Vector,
        Self::VectorGroup,
        Self::VectorGroupMember,
    ];

    /// Returns the position of this kind in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Unit => 0,
            Self::Scalar => 1,
            Self::Vector => 2,
            Self::VectorGroup => 3,
            Self::VectorGroupMember => 4,
        }
    }

    /// Returns the human-readable name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Scalar => "scalar",
            Self::Vector => "vector",
            Self::VectorGroup => "vector group",
            Self::VectorGroupMember => "vector group member",
        }
    }
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
