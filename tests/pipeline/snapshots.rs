//! Integration tests for `MessagePack` snapshots

use metrology_foundation::{ErrorKind, QuantityKind};
use metrology_pipeline::snapshot::{self, Snapshot};
use metrology_pipeline::compile;

use crate::support::{Source, id};

fn compiled() -> Snapshot {
    let declarations = Source::length()
        .specialized_group("Displacement", "Position")
        .companion("Distance")
        .member("Position3", "Position")
        .build();
    Snapshot::from_compilation(&compile(&declarations).unwrap())
}

#[test]
fn snapshot_lists_definitions_by_registry() {
    let taken = compiled();
    let kinds: Vec<QuantityKind> = taken.definitions.iter().map(|d| d.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            QuantityKind::Unit,
            QuantityKind::Scalar,
            QuantityKind::VectorGroup,
            QuantityKind::VectorGroup,
            QuantityKind::VectorGroupMember,
        ]
    );
    assert_eq!(taken.diagnostics.len(), 1);
}

#[test]
fn bytes_restore_the_snapshot() {
    let original = compiled();
    let bytes = snapshot::to_bytes(&original).unwrap();
    let restored = snapshot::from_bytes(&bytes).unwrap();
    assert_eq!(restored, original);

    let population = restored.population();
    assert_eq!(population.len(), 5);
    assert_eq!(
        population.group_bases().get(&id("Displacement")),
        Some(&id("Position"))
    );
    assert_eq!(
        population.members_of(&id("Position")).and_then(|m| m.get(&3)),
        Some(&id("Position3"))
    );
}

#[test]
fn files_restore_the_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("length.mtr");

    let original = compiled();
    snapshot::save_to_file(&original, &path).unwrap();
    assert_eq!(snapshot::load_from_file(&path).unwrap(), original);
}

#[test]
fn garbage_is_a_serialization_error() {
    let err = snapshot::from_bytes(&[0xc1, 0x00]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SerializationError(_)));
}

#[test]
fn file_errors_name_the_file_and_stage() {
    let err = snapshot::load_from_file("/nonexistent/length.mtr").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IoError(_)));
    let context = err.context.unwrap();
    assert_eq!(context.source.as_deref(), Some("/nonexistent/length.mtr"));
    assert_eq!(context.stages, vec!["load snapshot".to_string()]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.mtr");
    std::fs::write(&path, [0xc1, 0x00]).unwrap();
    let err = snapshot::load_from_file(&path).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SerializationError(_)));
    assert!(err.context.is_some());

    let err = snapshot::save_to_file(&compiled(), dir.path().join("missing/out.mtr")).unwrap_err();
    let context = err.context.unwrap();
    assert_eq!(context.stages, vec!["save snapshot".to_string()]);
}
