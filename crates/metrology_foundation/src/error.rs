//! Error types for Metrology API failures.
//!
//! Semantic problems found in declarations are not errors: they are
//! [`Diagnostic`](crate::Diagnostic) values carried by an
//! [`Outcome`](crate::Outcome). This type covers misuse of the API itself.

use std::fmt;

use thiserror::Error;

/// The main error type for Metrology operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a malformed identity error.
    #[must_use]
    pub fn invalid_identity(identity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidIdentity {
            identity: identity.into(),
            reason: reason.into(),
        })
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfig(message.into()))
    }

    /// Creates a cancellation error for the named stage.
    #[must_use]
    pub fn cancelled(stage: &'static str) -> Self {
        Self::new(ErrorKind::Cancelled { stage })
    }

    /// Returns true if this error reports a cancelled pass.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A qualified type name could not be parsed.
    #[error("invalid type identity '{identity}': {reason}")]
    InvalidIdentity {
        /// The text that was parsed.
        identity: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Configuration values are inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The pass was cancelled before it completed.
    #[error("pass cancelled during {stage}")]
    Cancelled {
        /// The stage that observed the cancellation.
        stage: &'static str,
    },

    /// A snapshot could not be encoded or decoded.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// A snapshot file could not be read or written.
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// File being read or written.
    pub source: Option<String>,
    /// Stages entered, outermost first.
    pub stages: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file being handled.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a stage frame.
    #[must_use]
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stages.push(stage.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
        }
        for stage in &self.stages {
            write!(f, "\n  during {stage}")?;
        }
        Ok(())
    }
}

/// Result type alias using Metrology's Error.
pub type Result<T> = std::result::Result<T, Error>;
