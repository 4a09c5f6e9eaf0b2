//! End-to-end behavior of a resolution pass

use metrology_declaration::{Definition, Property};
use metrology_foundation::QuantityKind;
use metrology_pipeline::{Snapshot, compile};
use metrology_population::{
    DeclarationTally, Population, Processed, ValidatedDefinition, Validator, assemble,
};

use crate::support::{Source, id, names};

#[test]
fn identity_declared_as_two_kinds_enters_no_registry() {
    let declarations = Source::length()
        .scalar("Speed", "UnitOfLength")
        .group("Speed", "UnitOfLength")
        .build();

    let compilation = compile(&declarations).unwrap();
    let population = compilation.population();
    for kind in QuantityKind::ALL {
        assert!(!population.contains(kind, &id("Speed")));
    }
    assert_eq!(
        names(compilation.diagnostics_for(&id("Speed"))),
        vec!["TypeAlreadyVectorGroup", "TypeAlreadyScalar"]
    );
}

#[test]
fn chain_members_share_the_root() {
    let declarations = Source::new("chain.cs")
        .unit("UnitOfLength", "Length", &[("Metre", "m")])
        .scalar("Length", "UnitOfLength")
        .specialized_group("A", "B")
        .specialized_group("B", "C")
        .group("C", "UnitOfLength")
        .build();

    let compilation = compile(&declarations).unwrap();
    let bases = compilation.population().group_bases();
    assert_eq!(bases.get(&id("A")), Some(&id("C")));
    assert_eq!(bases.get(&id("B")), Some(&id("C")));
    assert!(compilation.is_success());
}

#[test]
fn cyclic_chain_is_never_published() {
    let declarations = Source::length()
        .specialized_group("A", "B")
        .specialized_group("B", "A")
        .build();

    let compilation = compile(&declarations).unwrap();
    let bases = compilation.population().group_bases();
    assert!(bases.get(&id("A")).is_none());
    assert!(bases.get(&id("B")).is_none());
    assert_eq!(
        names(compilation.diagnostics()),
        vec!["RootVectorGroupNotResolved", "RootVectorGroupNotResolved"]
    );
}

#[test]
fn missing_original_rejects_the_specialization() {
    let declarations = Source::length()
        .specialized_group("Displacement", "Translation")
        .build();

    let compilation = compile(&declarations).unwrap();
    assert!(compilation.population().group(&id("Displacement")).is_none());
    assert_eq!(
        names(compilation.diagnostics_for(&id("Displacement"))),
        vec!["OriginalNotVectorGroup"]
    );
}

#[test]
fn missing_scalar_downgrades_to_none() {
    let declarations = Source::length()
        .specialized_group("Displacement", "Position")
        .companion("Distance")
        .build();

    let compilation = compile(&declarations).unwrap();
    let displacement = compilation.population().group(&id("Displacement")).unwrap();
    assert_eq!(displacement.definition().scalar, None);
    assert_eq!(
        names(compilation.diagnostics_for(&id("Displacement"))),
        vec!["TypeNotScalar"]
    );
}

#[test]
fn independent_optional_failures_are_all_reported() {
    let declarations = Source::length()
        .specialized_group("Displacement", "Position")
        .companion("Distance")
        .difference("Offset")
        .build();

    let compilation = compile(&declarations).unwrap();
    assert_eq!(compilation.diagnostics_for(&id("Displacement")).count(), 2);
    assert!(compilation.population().group(&id("Displacement")).is_some());
}

#[test]
fn disabled_difference_with_quantity_still_resolves() {
    let declarations = Source::new("groups.cs")
        .unit("U", "Magnitude", &[("Step", "st")])
        .scalar("Magnitude", "U")
        .group("V", "U")
        .group("D", "U")
        .specialized_group("S", "V")
        .quantity(|q, location| q.implement_difference = Property::set(false, location))
        .difference("D")
        .build();

    let compilation = compile(&declarations).unwrap();
    assert_eq!(
        names(compilation.diagnostics()),
        vec!["DifferenceDisabledButQuantitySpecified"]
    );
    assert!(compilation.is_success());
    assert_eq!(
        compilation.population().group_bases().get(&id("S")),
        Some(&id("V"))
    );
}

/// Assembles the validation snapshot of already processed definitions.
fn snapshot_of(definitions: &[Definition]) -> Population<Processed> {
    let tally = DeclarationTally::from_definitions(definitions);
    assemble(definitions.iter().cloned().collect(), &tally)
}

#[test]
fn revalidating_published_definitions_is_stable() {
    let declarations = Source::length()
        .specialized_group("Displacement", "Position")
        .companion("Distance")
        .default_unit("Foot", "f")
        .build();

    let compilation = compile(&declarations).unwrap();
    assert_eq!(compilation.diagnostics().len(), 2);

    let definitions: Vec<Definition> = Snapshot::from_compilation(&compilation)
        .definitions
        .iter()
        .map(ValidatedDefinition::to_definition)
        .collect();
    let population = snapshot_of(&definitions);
    let validator = Validator::new(&population);

    let revalidate = || -> Vec<_> {
        definitions
            .iter()
            .enumerate()
            .map(|(ordinal, d)| validator.validate(ordinal, d))
            .collect()
    };
    let first = revalidate();
    let second = revalidate();
    assert_eq!(first, second);
    assert!(first.iter().all(|o| o.is_success() && o.diagnostics().is_empty()));
}
