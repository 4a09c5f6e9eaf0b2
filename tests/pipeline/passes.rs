//! Integration tests for resolution passes

use metrology_declaration::ProcessorOptions;
use metrology_foundation::{QuantityKind, Severity};
use metrology_pipeline::{CancellationToken, Pipeline, PipelineConfig, compile};

use crate::support::{Source, id, names};

#[test]
fn empty_input_publishes_empty_population() {
    let compilation = compile(&[]).unwrap();
    assert!(compilation.is_success());
    assert!(compilation.population().is_empty());
    assert_eq!(compilation.stats().rounds, 1);
}

#[test]
fn processing_and_validation_diagnostics_are_merged_in_order() {
    let declarations = Source::length()
        .vector("Broken", "UnitOfLength", 99)
        .specialized_group("Distance", "Length")
        .build();

    let compilation = compile(&declarations).unwrap();
    assert_eq!(
        names(compilation.diagnostics()),
        vec!["InvalidVectorDimension", "OriginalNotVectorGroup"]
    );
    assert_eq!(compilation.stats().definitions, 4);
    assert_eq!(compilation.stats().rejected, 1);
    assert_eq!(compilation.stats().resolved, 3);
}

#[test]
fn diagnostics_for_filters_by_identity() {
    let declarations = Source::length()
        .specialized_group("Displacement", "Position")
        .companion("Distance")
        .build();

    let compilation = compile(&declarations).unwrap();
    assert_eq!(compilation.diagnostics_for(&id("Displacement")).count(), 1);
    assert_eq!(compilation.diagnostics_for(&id("Position")).count(), 0);
    assert_eq!(compilation.errors().count(), 1);
}

#[test]
fn heuristics_follow_processor_options() {
    let declarations = Source::length()
        .specialized_vector("Velocity2", "Position3")
        .vector("Position3", "UnitOfLength", 3)
        .build();

    let loud = compile(&declarations).unwrap();
    assert_eq!(
        names(loud.warnings()),
        vec!["VectorNameAndDimensionConflict"]
    );
    assert!(loud.warnings().all(|d| d.severity() == Severity::Warning));

    let quiet = Pipeline::new(PipelineConfig::default().with_processor(ProcessorOptions::quiet()))
        .run(&declarations)
        .unwrap();
    assert_eq!(quiet.warnings().count(), 0);
    assert!(quiet.population().contains(QuantityKind::Vector, &id("Velocity2")));
}

#[test]
fn round_limit_stops_early() {
    let declarations = Source::length()
        .group("A", "UnitOfMass")
        .specialized_group("B", "A")
        .specialized_group("C", "B")
        .build();

    let bounded = Pipeline::new(PipelineConfig::sequential().with_max_rounds(1))
        .run(&declarations)
        .unwrap();
    assert_eq!(bounded.stats().rounds, 1);
    assert!(!bounded.population().contains(QuantityKind::VectorGroup, &id("C")));

    let unbounded = compile(&declarations).unwrap();
    assert_eq!(unbounded.stats().rounds, 3);
    assert_eq!(
        names(unbounded.diagnostics_for(&id("C"))),
        vec!["RootVectorGroupNotResolved"]
    );
}

#[test]
fn round_limit_withholds_types_requiring_rejected_ones() {
    let declarations = Source::length()
        .unit("UnitOfMass", "Nothing", &[("Gram", "g")])
        .group("Momentum", "UnitOfMass")
        .scalar("Speed", "UnitOfLength")
        .companion("Momentum")
        .build();

    let bounded = Pipeline::new(PipelineConfig::sequential().with_max_rounds(1))
        .run(&declarations)
        .unwrap();
    assert_eq!(bounded.stats().rounds, 1);
    assert_eq!(
        names(bounded.diagnostics_for(&id("UnitOfMass"))),
        vec!["UnitQuantityNotScalar"]
    );
    assert_eq!(bounded.diagnostics_for(&id("Momentum")).count(), 0);

    let population = bounded.population();
    assert!(!population.contains(QuantityKind::Unit, &id("UnitOfMass")));
    assert!(!population.contains(QuantityKind::VectorGroup, &id("Momentum")));
    assert_eq!(bounded.stats().rejected, 2);

    let speed = population.scalar(&id("Speed")).unwrap();
    assert_eq!(speed.definition().vector, None);
}

#[test]
fn round_limit_without_failures_withholds_nothing() {
    let declarations = Source::length().member("Position3", "Position").build();

    let bounded = Pipeline::new(PipelineConfig::sequential().with_max_rounds(1))
        .run(&declarations)
        .unwrap();
    assert!(bounded.diagnostics().is_empty());
    assert_eq!(bounded.stats().rejected, 0);
    assert_eq!(bounded.population().len(), 4);
}

#[test]
fn repeated_declarations_at_one_location_are_reported_once() {
    let declarations = Source::length().group("Momentum", "UnitOfLength").repeated().build();

    for config in [PipelineConfig::sequential(), PipelineConfig::default()] {
        let compilation = Pipeline::new(config).run(&declarations).unwrap();
        assert_eq!(
            names(compilation.diagnostics_for(&id("Momentum"))),
            vec!["TypeAlreadyVectorGroup"]
        );
        assert!(!compilation.population().contains(QuantityKind::VectorGroup, &id("Momentum")));
    }
}

#[test]
fn group_members_are_published_with_their_group() {
    let declarations = Source::length()
        .member("Position2", "Position")
        .member("Position3", "Position")
        .vector("Velocity3", "UnitOfLength", 3)
        .difference("Position")
        .build();

    let compilation = compile(&declarations).unwrap();
    assert!(compilation.diagnostics().is_empty());

    let population = compilation.population();
    let members = population.members_of(&id("Position")).unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members.get(&3), Some(&id("Position3")));
    assert_eq!(
        population.kind_of(&id("Position2")),
        Some(QuantityKind::VectorGroupMember)
    );
}

#[test]
fn rejected_group_takes_its_members() {
    let declarations = Source::length()
        .group("Momentum", "UnitOfMass")
        .member("Momentum3", "Momentum")
        .build();

    let compilation = compile(&declarations).unwrap();
    assert_eq!(
        names(compilation.diagnostics_for(&id("Momentum"))),
        vec!["TypeNotUnit"]
    );
    assert_eq!(
        names(compilation.diagnostics_for(&id("Momentum3"))),
        vec!["TypeNotVectorGroup"]
    );
    assert!(compilation.population().members().is_empty());
}

#[test]
fn cancellation_is_observed() {
    let token = CancellationToken::new();
    let pipeline = Pipeline::new(PipelineConfig::default()).with_cancellation(token.clone());
    assert!(pipeline.run(&Source::length().build()).is_ok());

    token.cancel();
    assert!(pipeline.cancellation().is_cancelled());
    let err = pipeline.run(&Source::length().build()).unwrap_err();
    assert!(err.is_cancelled());
}
