//! Integration tests for diagnostics and accumulating results

use metrology_foundation::{
    Diagnostic, DiagnosticKind, Outcome, QuantityKind, Severity, SourceLocation, TypeIdentity,
    Validity, sort_canonically,
};

fn id(name: &str) -> TypeIdentity {
    TypeIdentity::new("Physics", name)
}

fn at(line: u32) -> SourceLocation {
    SourceLocation::at("quantities.cs", line, 1)
}

fn not_scalar(name: &str, line: u32) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind::TypeNotScalar { target: id("Distance") },
        id(name),
        at(line),
    )
}

#[test]
fn codes_and_severities() {
    let kind = DiagnosticKind::already_defined_as(QuantityKind::VectorGroup);
    assert_eq!(kind.name(), "TypeAlreadyVectorGroup");
    assert_eq!(kind.severity(), Severity::Error);

    let warning = DiagnosticKind::VectorGroupNameSuggestsDimension { dimension: 3 };
    assert_eq!(warning.severity(), Severity::Warning);
    assert_ne!(kind.code(), warning.code());
}

#[test]
fn display_includes_location_code_and_identity() {
    let text = not_scalar("Position", 4).to_string();
    assert!(text.starts_with("quantities.cs:4:1: "));
    assert!(text.contains("MTR"));
    assert!(text.contains("Physics.Position"));
}

#[test]
fn canonical_order_is_by_location_then_identity() {
    let unlocated = Diagnostic::unlocated(
        DiagnosticKind::TypeNotUnit { target: id("UnitOfMass") },
        id("Alpha"),
    );
    let mut diagnostics = vec![
        unlocated.clone(),
        not_scalar("Velocity", 9),
        not_scalar("Position", 9),
        not_scalar("Zeta", 2),
    ];
    sort_canonically(&mut diagnostics);

    let order: Vec<&str> = diagnostics.iter().map(|d| d.identity.name()).collect();
    assert_eq!(order, vec!["Zeta", "Position", "Velocity", "Alpha"]);
}

#[test]
fn and_then_short_circuits() {
    let mut ran = false;
    let validity = Validity::invalid(not_scalar("Position", 1)).and_then(|| {
        ran = true;
        Validity::valid()
    });
    assert!(!ran);
    assert!(!validity.is_valid());
    assert_eq!(validity.diagnostics().len(), 1);
}

#[test]
fn merge_keeps_every_diagnostic() {
    let validity: Validity = vec![
        Validity::invalid(not_scalar("Position", 1)),
        Validity::valid(),
        Validity::invalid(not_scalar("Velocity", 2)),
    ]
    .into_iter()
    .collect();
    assert!(!validity.is_valid());
    assert_eq!(validity.diagnostics().len(), 2);
}

#[test]
fn transform_downgrades_to_none() {
    let kept = Validity::valid().transform(id("Length"));
    let dropped = Validity::invalid(not_scalar("Position", 1)).transform(id("Length"));
    assert_eq!(kept.value(), Some(&id("Length")));
    assert_eq!(dropped.value(), None);
    assert_eq!(dropped.diagnostics().len(), 1);
}

#[test]
fn absorb_collects_diagnostics() {
    let mut outcome = Outcome::success(());
    let dropped: Option<u32> = outcome.absorb(Outcome::failure(vec![not_scalar("Position", 1)]));
    let kept = outcome.absorb(Outcome::success(7));

    assert_eq!(dropped, None);
    assert_eq!(kept, Some(7));
    assert!(outcome.is_success());
    assert_eq!(outcome.diagnostics().len(), 1);
}
