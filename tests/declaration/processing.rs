//! Integration tests for per-declaration processing

use metrology_declaration::{
    ConversionOperatorBehaviour, Declaration, Definition, Origin, ProcessorOptions, Property,
    SpecializedScalarDeclaration, process,
};
use metrology_foundation::{QuantityKind, SourceLocation};

use crate::support::{Source, id, names};

fn process_all(declarations: &[Declaration]) -> Vec<Definition> {
    declarations
        .iter()
        .filter_map(|d| process(d, &ProcessorOptions::default()).value().cloned())
        .collect()
}

// =============================================================================
// Shapes
// =============================================================================

#[test]
fn every_shape_targets_its_registry() {
    let declarations = Source::length()
        .specialized_scalar("Distance", "Length")
        .vector("Position3", "UnitOfLength", 3)
        .specialized_vector("Displacement3", "Position3")
        .specialized_group("Displacement", "Position")
        .build();

    let kinds: Vec<QuantityKind> = process_all(&declarations).iter().map(Definition::kind).collect();
    assert_eq!(
        kinds,
        vec![
            QuantityKind::Unit,
            QuantityKind::Scalar,
            QuantityKind::VectorGroup,
            QuantityKind::Scalar,
            QuantityKind::Vector,
            QuantityKind::Vector,
            QuantityKind::VectorGroup,
        ]
    );
}

#[test]
fn unit_instances_keep_symbols() {
    let definitions = process_all(&Source::length().build());
    let Definition::Unit(unit) = &definitions[0] else {
        panic!("expected a unit");
    };
    assert_eq!(unit.quantity.identity, id("Length"));
    assert_eq!(unit.instance("Foot").and_then(|i| i.symbol.as_deref()), Some("ft"));
    assert_eq!(unit.instance("Foot").map(|i| i.plural.as_str()), Some("Foots"));
    assert!(!unit.bias_term);
}

#[test]
fn specialization_defaults() {
    let definitions = process_all(&Source::length().specialized_scalar("Distance", "Length").build());
    let Some(Definition::Scalar(distance)) = definitions.last() else {
        panic!("expected a scalar");
    };
    let Origin::Specialized(specialization) = &distance.origin else {
        panic!("expected a specialization");
    };
    assert_eq!(specialization.original.identity, id("Length"));
    assert!(specialization.inheritance.units);
    assert_eq!(specialization.casts.forwards, ConversionOperatorBehaviour::Implicit);
    assert_eq!(specialization.casts.backwards, ConversionOperatorBehaviour::Explicit);
    assert!(distance.quantity.implements_sum());
    assert!(distance.quantity.implements_difference());
}

#[test]
fn explicit_casts_are_kept() {
    let location = SourceLocation::at("casts.cs", 1, 1);
    let mut d = SpecializedScalarDeclaration::new(id("Distance"), location.clone());
    d.original = Property::set(id("Length"), location.clone());
    d.casts.forwards = Property::set(0, location.clone());
    d.casts.backwards = Property::set(2, location);

    let outcome = process(&d.into(), &ProcessorOptions::default());
    let Some(Definition::Scalar(distance)) = outcome.value() else {
        panic!("expected a scalar");
    };
    let Origin::Specialized(specialization) = &distance.origin else {
        panic!("expected a specialization");
    };
    assert_eq!(specialization.casts.forwards, ConversionOperatorBehaviour::None);
    assert_eq!(specialization.casts.backwards, ConversionOperatorBehaviour::Implicit);
}

// =============================================================================
// Diagnostics
// =============================================================================

#[test]
fn fatal_problems_produce_nothing() {
    let declarations = Source::new("broken.cs")
        .vector("Position1", "UnitOfLength", 1)
        .vector("Position40", "UnitOfLength", 40)
        .build();

    for declaration in &declarations {
        let outcome = process(declaration, &ProcessorOptions::default());
        assert!(!outcome.is_success());
        assert_eq!(names(outcome.diagnostics()), vec!["InvalidVectorDimension"]);
    }
}

#[test]
fn difference_disabled_but_specified_is_a_warning() {
    let declarations = Source::length()
        .specialized_group("Displacement", "Position")
        .quantity(|q, location| q.implement_difference = Property::set(false, location))
        .difference("Offset")
        .build();

    let outcome = process(&declarations[3], &ProcessorOptions::default());
    assert!(outcome.is_success());
    assert_eq!(names(outcome.diagnostics()), vec!["DifferenceDisabledButQuantitySpecified"]);
    assert!(outcome.diagnostics().iter().all(|d| !d.is_error()));
}

#[test]
fn half_default_unit_is_dropped() {
    let declarations = Source::length()
        .quantity(|q, location| q.default_unit_name = Property::set("Metre".into(), location))
        .build();

    let outcome = process(&declarations[2], &ProcessorOptions::default());
    let Some(Definition::Group(position)) = outcome.value() else {
        panic!("expected a vector group");
    };
    assert_eq!(position.quantity.default_unit, None);
    assert_eq!(names(outcome.diagnostics()), vec!["DefaultUnitNameWithoutSymbol"]);
}

#[test]
fn diagnostics_point_at_the_property() {
    let declarations = Source::length().difference("Offset").build();
    let outcome = process(&declarations[2], &ProcessorOptions::default());
    assert!(outcome.diagnostics().is_empty());

    let Some(Definition::Group(position)) = outcome.value() else {
        panic!("expected a vector group");
    };
    let difference = position.quantity.difference.as_ref().unwrap();
    assert_eq!(difference.location.line(), 4);
}
