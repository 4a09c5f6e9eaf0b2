//! Integration tests for identity exclusivity across registries

use metrology_foundation::{DiagnosticKind, QuantityKind};
use metrology_population::validate;
use proptest::prelude::*;

use crate::snapshot;
use crate::support::{Source, id, names};

fn declare(source: Source, kind: QuantityKind) -> Source {
    match kind {
        QuantityKind::Unit => source.unit("Shared", "Length", &[("Tick", "t")]),
        QuantityKind::Scalar => source.scalar("Shared", "UnitOfLength"),
        QuantityKind::Vector => source.vector("Shared", "UnitOfLength", 3),
        QuantityKind::VectorGroup => source.group("Shared", "UnitOfLength"),
        QuantityKind::VectorGroupMember => source.member_of_dimension("Shared", "Position", 3),
    }
}

#[test]
fn scalar_and_group_conflict() {
    let source = declare(Source::length(), QuantityKind::Scalar);
    let source = declare(source, QuantityKind::VectorGroup);
    let (definitions, population) = snapshot(&source.build());

    let as_scalar = validate(3, &definitions[3], &population);
    let as_group = validate(4, &definitions[4], &population);
    assert_eq!(names(as_scalar.diagnostics()), vec!["TypeAlreadyVectorGroup"]);
    assert_eq!(names(as_group.diagnostics()), vec!["TypeAlreadyScalar"]);
    assert!(population.kind_of(&id("Shared")).is_none());
}

#[test]
fn unit_and_group_conflict() {
    let source = declare(Source::length(), QuantityKind::Unit);
    let source = declare(source, QuantityKind::VectorGroup);
    let (definitions, population) = snapshot(&source.build());

    let as_unit = validate(3, &definitions[3], &population);
    let as_group = validate(4, &definitions[4], &population);
    assert!(!as_unit.is_success());
    assert!(!as_group.is_success());
    assert_eq!(names(as_unit.diagnostics()), vec!["TypeAlreadyVectorGroup"]);
    assert_eq!(names(as_group.diagnostics()), vec!["TypeAlreadyUnit"]);
    assert!(!population.contains(QuantityKind::Unit, &id("Shared")));
    assert!(!population.contains(QuantityKind::VectorGroup, &id("Shared")));
}

#[test]
fn repeats_at_one_location_report_once() {
    let source = declare(Source::length(), QuantityKind::VectorGroup).repeated();
    let (definitions, population) = snapshot(&source.build());
    assert_eq!(definitions[3], definitions[4]);

    let first = validate(3, &definitions[3], &population);
    let second = validate(4, &definitions[4], &population);
    assert!(!first.is_success());
    assert!(!second.is_success());
    assert!(first.diagnostics().is_empty());
    assert_eq!(names(second.diagnostics()), vec!["TypeAlreadyVectorGroup"]);
}

#[test]
fn three_kinds_report_each_other() {
    let mut source = Source::length();
    for kind in [QuantityKind::Unit, QuantityKind::Scalar, QuantityKind::Vector] {
        source = declare(source, kind);
    }
    let (definitions, population) = snapshot(&source.build());

    let as_unit = validate(3, &definitions[3], &population);
    assert_eq!(
        names(as_unit.diagnostics()),
        vec!["TypeAlreadyScalar", "TypeAlreadyVector"]
    );
}

fn kinds() -> impl Strategy<Value = Vec<QuantityKind>> {
    proptest::collection::vec(proptest::sample::select(QuantityKind::ALL.to_vec()), 1..6)
}

proptest! {
    #[test]
    fn shared_identity_enters_a_registry_only_when_unique(declared in kinds()) {
        let mut source = Source::length();
        for kind in &declared {
            source = declare(source, *kind);
        }
        let (definitions, population) = snapshot(&source.build());

        let outcomes: Vec<_> = definitions
            .iter()
            .enumerate()
            .skip(3)
            .map(|(ordinal, d)| validate(ordinal, d, &population))
            .collect();

        if declared.len() == 1 {
            prop_assert_eq!(population.kind_of(&id("Shared")), Some(declared[0]));
            prop_assert!(outcomes[0].is_success());
        } else {
            prop_assert!(population.kind_of(&id("Shared")).is_none());
            prop_assert!(outcomes.iter().all(|o| !o.is_success()));

            for kind in QuantityKind::ALL {
                let count = declared.iter().filter(|k| **k == kind).count();
                let others = declared.len() - count;
                let name = DiagnosticKind::already_defined_as(kind).name();
                let reported = outcomes
                    .iter()
                    .flat_map(|o| o.diagnostics())
                    .filter(|d| d.kind.name() == name)
                    .count();
                let expected = others * usize::from(count > 0) + usize::from(count > 1);
                prop_assert_eq!(reported, expected);
            }
        }
    }
}
