//! Accumulating result types.
//!
//! Every stage returns a value together with the diagnostics it produced
//! instead of failing fast. [`Validity`] is the outcome of a check with no
//! payload; [`Outcome`] carries an optional value.
//!
//! Two ways of combining checks are provided:
//!
//! - [`Validity::and_then`] short-circuits: the next check only runs when the
//!   previous one passed. Used for gates that depend on each other.
//! - [`Validity::merge`] always keeps both sides. Used for independent checks
//!   so that a declaration with two problems reports both.

use crate::diagnostic::Diagnostic;

/// Result of a check: pass or fail, plus any diagnostics.
///
/// A failing validity may carry no diagnostics ("silent" failure), which is
/// how duplicates defer reporting to a single declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Validity {
    valid: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Validity {
    /// A passing check with no diagnostics.
    pub fn valid() -> Self {
        Self {
            valid: true,
            diagnostics: Vec::new(),
        }
    }

    /// A failing check reporting one diagnostic.
    pub fn invalid(diagnostic: Diagnostic) -> Self {
        Self {
            valid: false,
            diagnostics: vec![diagnostic],
        }
    }

    /// A failing check that reports nothing.
    pub fn invalid_silently() -> Self {
        Self {
            valid: false,
            diagnostics: Vec::new(),
        }
    }

    /// Passes if `condition` holds, otherwise fails with the built diagnostic.
    pub fn check(condition: bool, diagnostic: impl FnOnce() -> Diagnostic) -> Self {
        if condition {
            Self::valid()
        } else {
            Self::invalid(diagnostic())
        }
    }

    /// Always passes, attaching the built diagnostic if `condition` holds.
    pub fn warn_if(condition: bool, diagnostic: impl FnOnce() -> Diagnostic) -> Self {
        if condition {
            Self {
                valid: true,
                diagnostics: vec![diagnostic()],
            }
        } else {
            Self::valid()
        }
    }

    /// Returns true if the check passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the diagnostics reported so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Runs `next` only if this check passed, concatenating diagnostics.
    pub fn and_then(self, next: impl FnOnce() -> Self) -> Self {
        if self.valid {
            self.merge(next())
        } else {
            self
        }
    }

    /// Combines two independent checks: valid iff both are valid.
    pub fn merge(mut self, other: Self) -> Self {
        self.valid &= other.valid;
        self.diagnostics.extend(other.diagnostics);
        self
    }

    /// Keeps `value` if valid, downgrades it to `None` otherwise.
    pub fn transform<T>(self, value: T) -> Outcome<T> {
        Outcome {
            value: self.valid.then_some(value),
            diagnostics: self.diagnostics,
        }
    }

    /// Consumes the validity, returning its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Default for Validity {
    fn default() -> Self {
        Self::valid()
    }
}

impl FromIterator<Validity> for Validity {
    /// Merges every check; no short-circuit.
    fn from_iter<I: IntoIterator<Item = Validity>>(iter: I) -> Self {
        iter.into_iter().fold(Self::valid(), Self::merge)
    }
}

/// An optional value plus the diagnostics produced while computing it.
///
/// `value` is `None` when a fatal problem was found; the diagnostics explain
/// why. A present value may still come with non-fatal diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Outcome<T> {
    value: Option<T>,
    diagnostics: Vec<Diagnostic>,
}

impl<T> Outcome<T> {
    /// A value with no diagnostics.
    pub fn success(value: T) -> Self {
        Self {
            value: Some(value),
            diagnostics: Vec::new(),
        }
    }

    /// No value, with the given diagnostics.
    pub fn failure(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            value: None,
            diagnostics,
        }
    }

    /// Builds an outcome from its parts.
    pub fn new(value: Option<T>, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// Returns the value, if produced.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns true if a value was produced.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.value.is_some()
    }

    /// Returns the diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Transforms the value, keeping the diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: self.value.map(f),
            diagnostics: self.diagnostics,
        }
    }

    /// Chains a dependent computation; skipped if there is no value.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self.value {
            Some(value) => {
                let mut next = f(value);
                let mut diagnostics = self.diagnostics;
                diagnostics.append(&mut next.diagnostics);
                Outcome {
                    value: next.value,
                    diagnostics,
                }
            }
            None => Outcome::failure(self.diagnostics),
        }
    }

    /// Keeps the value only if the check on it passes.
    pub fn validate(self, check: impl FnOnce(&T) -> Validity) -> Self {
        match self.value {
            Some(value) => {
                let validity = check(&value);
                let mut diagnostics = self.diagnostics;
                let valid = validity.is_valid();
                diagnostics.extend(validity.into_diagnostics());
                Self {
                    value: valid.then_some(value),
                    diagnostics,
                }
            }
            None => self,
        }
    }

    /// Appends a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Appends diagnostics.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Moves the diagnostics of `other` into this outcome and returns its value.
    pub fn absorb<U>(&mut self, other: Outcome<U>) -> Option<U> {
        self.diagnostics.extend(other.diagnostics);
        other.value
    }

    /// Consumes the outcome, returning the value and diagnostics.
    #[must_use]
    pub fn into_parts(self) -> (Option<T>, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }
}
