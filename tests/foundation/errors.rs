//! Integration tests for API errors

use metrology_foundation::{Error, ErrorContext, ErrorKind, TypeIdentity};

#[test]
fn invalid_identity_kind() {
    let err = TypeIdentity::parse("").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidIdentity { .. }));
}

#[test]
fn cancellation_names_stage() {
    let err = Error::cancelled("validation");
    assert!(err.is_cancelled());
    assert_eq!(err.to_string(), "pass cancelled during validation");
}

#[test]
fn context_is_attached() {
    let err = Error::invalid_config("min > max")
        .with_context(ErrorContext::new().with_source("metrology.toml"));
    assert_eq!(
        err.context.and_then(|c| c.source),
        Some("metrology.toml".to_string())
    );
}

#[test]
fn snapshot_errors_display() {
    let err = Error::new(ErrorKind::SerializationError("truncated".into()));
    assert!(err.to_string().contains("truncated"));
    let err = Error::new(ErrorKind::IoError("denied".into()));
    assert!(err.to_string().contains("denied"));
}
