//! Type identities.
//!
//! A [`TypeIdentity`] names one declared type: a namespace (or assembly) plus a
//! type name. Identities are the keys of every registry, so they are cheap to
//! clone (shared `Arc<str>` parts) and totally ordered for canonical merging.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Globally unique key of a declared type.
///
/// Two identities are equal iff both the namespace and the name are equal.
/// Ordering is namespace first, then name.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeIdentity {
    namespace: Arc<str>,
    name: Arc<str>,
}

impl TypeIdentity {
    /// Creates an identity from a namespace and a type name.
    ///
    /// An empty namespace denotes the global namespace.
    #[must_use]
    pub fn new(namespace: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        Self {
            namespace: Arc::from(namespace.as_ref()),
            name: Arc::from(name.as_ref()),
        }
    }

    /// Parses a qualified name such as `Physics.Vectors.Position3`.
    ///
    /// Everything before the last `.` is the namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidIdentity`] if the type name is empty or
    /// the namespace contains an empty segment.
    pub fn parse(qualified: &str) -> Result<Self> {
        let (namespace, name) = match qualified.rfind('.') {
            Some(pos) => (&qualified[..pos], &qualified[pos + 1..]),
            None => ("", qualified),
        };

        if name.is_empty() {
            return Err(Error::invalid_identity(qualified, "type name is empty"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(Error::invalid_identity(
                qualified,
                "type name contains whitespace",
            ));
        }
        if !namespace.is_empty() && namespace.split('.').any(str::is_empty) {
            return Err(Error::invalid_identity(
                qualified,
                "namespace contains an empty segment",
            ));
        }

        Ok(Self::new(namespace, name))
    }

    /// Returns the namespace, empty for the global namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the unqualified type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the type lives in the global namespace.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Returns the trailing decimal digits of the type name, if any.
    ///
    /// `Position3` yields `Some(3)`, `Velocity` yields `None`. Used by the
    /// name/dimension heuristics.
    #[must_use]
    pub fn trailing_number(&self) -> Option<u32> {
        let digits = self
            .name
            .chars()
            .rev()
            .take_while(char::is_ascii_digit)
            .count();
        if digits == 0 || digits == self.name.len() {
            return None;
        }
        self.name[self.name.len() - digits..].parse().ok()
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

impl fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeIdentity({self})")
    }
}
