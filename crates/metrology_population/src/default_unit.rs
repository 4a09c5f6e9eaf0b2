//! Default unit resolution.
//!
//! A quantity may name one instance of its unit as the default. The name has
//! to be an instance of the unit inherited from the root of the chain, and a
//! given symbol has to agree with the symbol that instance declares.

use metrology_declaration::{DefaultUnit, UnitDefinition};
use metrology_foundation::{Diagnostic, DiagnosticKind, Outcome, TypeIdentity};

/// Checks a default unit against the unit of its quantity.
///
/// The outcome always carries a value: the default unit, with the symbol
/// dropped on a symbol mismatch, or `None` if the name is not an instance.
#[must_use]
pub fn resolve_default_unit(
    subject: &TypeIdentity,
    default_unit: Option<&DefaultUnit>,
    unit: &UnitDefinition,
) -> Outcome<Option<DefaultUnit>> {
    let Some(default_unit) = default_unit else {
        return Outcome::success(None);
    };

    let Some(instance) = unit.instance(&default_unit.name) else {
        return Outcome::new(
            Some(None),
            vec![Diagnostic::new(
                DiagnosticKind::UnrecognizedDefaultUnit {
                    name: default_unit.name.clone(),
                    unit: unit.identity.clone(),
                },
                subject.clone(),
                default_unit.location.clone(),
            )],
        );
    };

    match (&default_unit.symbol, &instance.symbol) {
        (Some(symbol), Some(expected)) if symbol != expected => Outcome::new(
            Some(Some(DefaultUnit {
                symbol: None,
                ..default_unit.clone()
            })),
            vec![Diagnostic::new(
                DiagnosticKind::DefaultUnitSymbolMismatch {
                    symbol: symbol.clone(),
                    expected: expected.clone(),
                    name: instance.name.clone(),
                },
                subject.clone(),
                default_unit.location.clone(),
            )],
        ),
        _ => Outcome::success(Some(default_unit.clone())),
    }
}
