//! Three-state raw properties.

use metrology_foundation::SourceLocation;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A property as written in a declaration.
///
/// Distinguishes a property the author never wrote from one explicitly set to
/// null, which matters for required references and for reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Property<T> {
    /// Not written; the documented default applies.
    Default,
    /// Explicitly written as null.
    Null(SourceLocation),
    /// Explicitly written with a value.
    Set(T, SourceLocation),
}

impl<T> Property<T> {
    /// Creates an explicitly set property.
    #[must_use]
    pub fn set(value: T, location: SourceLocation) -> Self {
        Self::Set(value, location)
    }

    /// Returns true if the author wrote this property, even as null.
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        !matches!(self, Self::Default)
    }

    /// Returns true if the property was explicitly null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null(_))
    }

    /// Returns the value, if set.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Set(value, _) => Some(value),
            _ => None,
        }
    }

    /// Returns where the property was written, if it was.
    #[must_use]
    pub const fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Default => None,
            Self::Null(location) | Self::Set(_, location) => Some(location),
        }
    }

    /// Returns the value and its location, if set.
    #[must_use]
    pub fn located(&self) -> Option<(&T, &SourceLocation)> {
        match self {
            Self::Set(value, location) => Some((value, location)),
            _ => None,
        }
    }
}

impl<T> Default for Property<T> {
    fn default() -> Self {
        Self::Default
    }
}

impl<T: Clone> Property<T> {
    /// Returns the value if set, otherwise `default`.
    ///
    /// An explicit null also yields `default`.
    #[must_use]
    pub fn or(&self, default: T) -> T {
        self.value().cloned().unwrap_or(default)
    }
}
