//! Integration tests for vector group members

use metrology_foundation::QuantityKind;
use metrology_population::{GroupMember, ValidatedDefinition, validate};

use crate::snapshot;
use crate::support::{Source, id, names};

#[test]
fn members_are_listed_per_group() {
    let declarations = Source::length()
        .member("Position2", "Position")
        .member("Position3", "Position")
        .build();
    let (definitions, population) = snapshot(&declarations);

    let members = population.members_of(&id("Position")).unwrap();
    let listed: Vec<_> = members.iter().map(|(d, m)| (*d, m.clone())).collect();
    assert_eq!(listed, vec![(2, id("Position2")), (3, id("Position3"))]);

    for (ordinal, definition) in definitions.iter().enumerate().skip(3) {
        let outcome = validate(ordinal, definition, &population);
        assert!(outcome.diagnostics().is_empty());
        let Some(ValidatedDefinition::Member(member)) = outcome.value() else {
            panic!("expected a vector group member");
        };
        assert_eq!(member.group(), &id("Position"));
        assert_eq!(member.unit, id("UnitOfLength"));
    }
}

#[test]
fn explicit_dimension_is_used() {
    let declarations = Source::length()
        .member_of_dimension("Planar", "Position", 2)
        .build();
    let (_, population) = snapshot(&declarations);

    let planar = population.member_of_dimension(&id("Position"), 2).unwrap();
    assert_eq!(planar.identity, id("Planar"));
    assert_eq!(planar.dimension(), 2);
}

#[test]
fn repeated_dimension_is_reported_by_the_later_member() {
    let declarations = Source::length()
        .member("Position3", "Position")
        .member_of_dimension("Location", "Position", 3)
        .build();
    let (definitions, population) = snapshot(&declarations);

    assert!(validate(3, &definitions[3], &population).is_success());
    let later = validate(4, &definitions[4], &population);
    assert!(!later.is_success());
    assert_eq!(
        names(later.diagnostics()),
        vec!["VectorGroupAlreadyContainsDimension"]
    );
    assert_eq!(later.diagnostics()[0].identity, id("Location"));
}

#[test]
fn member_of_a_vector_is_rejected() {
    let declarations = Source::length()
        .vector("Velocity3", "UnitOfLength", 3)
        .member("Speed3", "Velocity3")
        .build();
    let (definitions, population) = snapshot(&declarations);

    let outcome = validate(4, &definitions[4], &population);
    assert!(!outcome.is_success());
    assert_eq!(names(outcome.diagnostics()), vec!["TypeNotVectorGroup"]);
    assert!(population.members_of(&id("Velocity3")).is_none());
}

#[test]
fn member_identity_is_exclusive() {
    let declarations = Source::length()
        .member("Position3", "Position")
        .vector("Position3", "UnitOfLength", 3)
        .build();
    let (definitions, population) = snapshot(&declarations);

    let as_member = validate(3, &definitions[3], &population);
    let as_vector = validate(4, &definitions[4], &population);
    assert_eq!(names(as_member.diagnostics()), vec!["TypeAlreadyVector"]);
    assert_eq!(
        names(as_vector.diagnostics()),
        vec!["TypeAlreadyVectorGroupMember"]
    );
    assert!(!population.contains(QuantityKind::VectorGroupMember, &id("Position3")));
    assert!(population.members_of(&id("Position")).is_none());
}

#[test]
fn vector_difference_resolves_through_group_members() {
    let declarations = Source::length()
        .member("Position3", "Position")
        .vector("Velocity3", "UnitOfLength", 3)
        .difference("Position")
        .vector("Velocity2", "UnitOfLength", 2)
        .difference("Position")
        .build();
    let (definitions, population) = snapshot(&declarations);

    let matching = validate(4, &definitions[4], &population);
    assert!(matching.diagnostics().is_empty());

    let missing = validate(5, &definitions[5], &population);
    assert!(missing.is_success());
    assert_eq!(
        names(missing.diagnostics()),
        vec!["VectorGroupLacksMemberOfDimension"]
    );
}
