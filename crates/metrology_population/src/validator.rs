//! Cross-population validation.
//!
//! Each processed definition is checked against an immutable snapshot of
//! every processed definition. Gates run in order and short-circuit:
//!
//! 1. the identity belongs to exactly one declaration;
//! 2. the specialized quantity, or the unit of a base, exists;
//! 3. the specialization chain reaches a base;
//! 4. the unit inherited from that base is registered.
//!
//! A definition passing all four is produced. Optional references and the
//! default unit are checked after that, independently of each other; a
//! failure drops the property and reports a diagnostic but never the
//! definition.
//!
//! Vector group members have no chain of their own: their group must be a
//! registered vector group, and they must hold their dimension in it.
//!
//! Every definition is validated together with its ordinal, the position the
//! declaration tally gave it.

use metrology_declaration::{
    Definition, GroupDefinition, MemberDefinition, Origin, QuantityBase, QuantityDefinition,
    Reference, ScalarDefinition, UnitDefinition, VectorDefinition,
};
use metrology_foundation::{
    Diagnostic, DiagnosticKind, Outcome, QuantityKind, SourceLocation, TypeIdentity, Validity,
};
use tracing::trace;

use crate::default_unit::resolve_default_unit;
use crate::population::Population;
use crate::stage::{Processed, Validated, ValidatedDefinition};

/// Validates one definition against the whole population.
///
/// Equivalent to `Validator::new(population).validate(ordinal, definition)`.
#[must_use]
pub fn validate(
    ordinal: usize,
    definition: &Definition,
    population: &Population<Processed>,
) -> Outcome<ValidatedDefinition> {
    Validator::new(population).validate(ordinal, definition)
}

/// Validates definitions against one population snapshot.
#[derive(Clone, Copy, Debug)]
pub struct Validator<'a> {
    population: &'a Population<Processed>,
    name_dimension_heuristics: bool,
}

/// What gates 1 to 4 established about a quantity.
struct Resolution<'a, B> {
    root: TypeIdentity,
    base: &'a B,
    unit: &'a UnitDefinition,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Validator<'a> {
    /// Creates a validator reading `population`.
    #[must_use]
    pub fn new(population: &'a Population<Processed>) -> Self {
        Self {
            population,
            name_dimension_heuristics: true,
        }
    }

    /// Builder method to enable/disable the advisory name heuristics.
    #[must_use]
    pub fn with_name_dimension_heuristics(mut self, enabled: bool) -> Self {
        self.name_dimension_heuristics = enabled;
        self
    }

    /// Validates one definition.
    ///
    /// `ordinal` is the definition's position in the sequence the population's
    /// tally was taken from. The outcome has a value iff gates 1 to 4 passed.
    #[must_use]
    pub fn validate(
        &self,
        ordinal: usize,
        definition: &Definition,
    ) -> Outcome<ValidatedDefinition> {
        let outcome = match definition {
            Definition::Unit(d) => self.validate_unit(ordinal, d).map(ValidatedDefinition::Unit),
            Definition::Scalar(d) => self
                .validate_scalar(ordinal, d)
                .map(ValidatedDefinition::Scalar),
            Definition::Vector(d) => self
                .validate_vector(ordinal, d)
                .map(ValidatedDefinition::Vector),
            Definition::Group(d) => self.validate_group(ordinal, d).map(ValidatedDefinition::Group),
            Definition::Member(d) => self
                .validate_member(ordinal, d)
                .map(ValidatedDefinition::Member),
        };

        trace!(
            identity = %definition.identity(),
            kind = %definition.kind(),
            valid = outcome.is_success(),
            diagnostics = outcome.diagnostics().len(),
            "validated definition"
        );

        outcome
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Gate 1: one check per kind, all run.
    ///
    /// A different kind sharing the identity is reported by every declaration.
    /// A repeated declaration of the same kind is reported once, by the second
    /// declaration in source order; the others fail silently. Declarations at
    /// one location are ordered by ordinal.
    fn exclusivity(
        &self,
        kind: QuantityKind,
        identity: &TypeIdentity,
        location: &SourceLocation,
        ordinal: usize,
    ) -> Validity {
        let Some(entry) = self.population.tally().get(identity) else {
            return Validity::valid();
        };

        QuantityKind::ALL
            .into_iter()
            .map(|other| {
                let count = entry.count(other);
                if other != kind {
                    Validity::check(count == 0, || {
                        report(DiagnosticKind::already_defined_as(other), identity, location)
                    })
                } else if count <= 1 {
                    Validity::valid()
                } else if entry.reporter(kind) == Some(ordinal) {
                    Validity::invalid(report(
                        DiagnosticKind::already_defined_as(kind),
                        identity,
                        location,
                    ))
                } else {
                    Validity::invalid_silently()
                }
            })
            .collect()
    }

    /// Gate 2 for quantities.
    fn reference_exists<D: QuantityDefinition>(&self, d: &D) -> Validity {
        match d.origin() {
            Origin::Specialized(specialization) => {
                let original = &specialization.original;
                if self.population.contains(D::KIND, &original.identity) {
                    Validity::valid()
                } else {
                    rejection(
                        DiagnosticKind::original_not(D::KIND, original.identity.clone()),
                        d.identity(),
                        &original.location,
                    )
                }
            }
            Origin::Base(base) => {
                let unit = base.unit();
                Validity::check(
                    self.population.contains(QuantityKind::Unit, &unit.identity),
                    || {
                        report(
                            DiagnosticKind::TypeNotUnit {
                                target: unit.identity.clone(),
                            },
                            d.identity(),
                            &unit.location,
                        )
                    },
                )
            }
        }
    }

    /// Gate 3: specializations must reach a base.
    fn root_resolved<D: QuantityDefinition>(&self, d: &D) -> Validity {
        match d.origin() {
            Origin::Base(_) => Validity::valid(),
            Origin::Specialized(specialization) => {
                let original = &specialization.original;
                if self.population.root_of(D::KIND, d.identity()).is_some() {
                    Validity::valid()
                } else {
                    rejection(
                        DiagnosticKind::root_not_resolved(D::KIND, original.identity.clone()),
                        d.identity(),
                        &original.location,
                    )
                }
            }
        }
    }

    /// Gates 1 to 4 for quantities.
    ///
    /// `base_of` looks up the root entry of a chain of this kind.
    fn resolve<D: QuantityDefinition + 'a>(
        &self,
        ordinal: usize,
        d: &D,
        base_of: impl Fn(&TypeIdentity) -> Option<&'a D>,
    ) -> Result<Resolution<'a, D::Base>, Vec<Diagnostic>> {
        let validity = self
            .exclusivity(D::KIND, d.identity(), d.location(), ordinal)
            .and_then(|| self.reference_exists(d))
            .and_then(|| self.root_resolved(d));
        if !validity.is_valid() {
            return Err(validity.into_diagnostics());
        }

        let root = base_of(d.identity());
        let base = root.and_then(|root| root.origin().base());
        let unit = base.and_then(|base| self.population.unit(&base.unit().identity));

        // Gate 4 reports nothing.
        let (Some(root), Some(base), Some(unit)) = (root, base, unit) else {
            trace!(identity = %d.identity(), "unit of the root quantity is not a registered unit");
            return Err(validity.into_diagnostics());
        };

        Ok(Resolution {
            root: root.identity().clone(),
            base,
            unit,
            diagnostics: validity.into_diagnostics(),
        })
    }

    /// Drops `reference` unless `exists` holds for its target.
    fn optional_reference(
        subject: &TypeIdentity,
        reference: Option<&Reference>,
        exists: impl FnOnce(&TypeIdentity) -> bool,
        diagnostic: impl FnOnce(TypeIdentity) -> DiagnosticKind,
    ) -> Outcome<Reference> {
        match reference {
            None => Outcome::failure(Vec::new()),
            Some(reference) => Validity::check(exists(&reference.identity), || {
                report(
                    diagnostic(reference.identity.clone()),
                    subject,
                    &reference.location,
                )
            })
            .transform(reference.clone()),
        }
    }

    // =========================================================================
    // Kinds
    // =========================================================================

    fn validate_unit(
        &self,
        ordinal: usize,
        d: &UnitDefinition,
    ) -> Outcome<Validated<UnitDefinition>> {
        let quantity = &d.quantity;
        self.exclusivity(QuantityKind::Unit, &d.identity, &d.location, ordinal)
            .and_then(|| {
                Validity::check(
                    self.population
                        .contains(QuantityKind::Scalar, &quantity.identity),
                    || {
                        report(
                            DiagnosticKind::UnitQuantityNotScalar {
                                quantity: quantity.identity.clone(),
                            },
                            &d.identity,
                            &quantity.location,
                        )
                    },
                )
            })
            .transform(Validated {
                definition: d.clone(),
                root: d.identity.clone(),
                unit: d.identity.clone(),
            })
    }

    fn validate_scalar(
        &self,
        ordinal: usize,
        d: &ScalarDefinition,
    ) -> Outcome<Validated<ScalarDefinition>> {
        let population = self.population;
        let resolution = match self.resolve(ordinal, d, |id| population.scalar_base(id)) {
            Ok(resolution) => resolution,
            Err(diagnostics) => return Outcome::failure(diagnostics),
        };

        let mut outcome = Outcome::new(Some(()), resolution.diagnostics);

        if let Origin::Base(base) = &d.origin {
            if base.use_unit_bias && !resolution.unit.bias_term {
                outcome.push(report(
                    DiagnosticKind::UnitNotIncludingBiasTerm {
                        unit: resolution.unit.identity.clone(),
                    },
                    &d.identity,
                    &base.unit.location,
                ));
                let (_, diagnostics) = outcome.into_parts();
                return Outcome::failure(diagnostics);
            }
        }

        let mut definition = d.clone();

        definition.vector = outcome.absorb(Self::optional_reference(
            &d.identity,
            d.vector.as_ref(),
            |target| {
                population.contains(QuantityKind::Vector, target)
                    || population.contains(QuantityKind::VectorGroup, target)
                    || population.contains(QuantityKind::VectorGroupMember, target)
            },
            |target| DiagnosticKind::TypeNotVector { target },
        ));
        definition.quantity.difference = outcome.absorb(Self::optional_reference(
            &d.identity,
            d.quantity.difference.as_ref(),
            |target| population.contains(QuantityKind::Scalar, target),
            |difference| DiagnosticKind::DifferenceNotScalar { difference },
        ));
        definition.quantity.default_unit = outcome
            .absorb(resolve_default_unit(
                &d.identity,
                d.quantity.default_unit.as_ref(),
                resolution.unit,
            ))
            .flatten();

        let unit = resolution.unit.identity.clone();
        outcome.map(|()| Validated {
            definition,
            root: resolution.root,
            unit,
        })
    }

    fn validate_vector(
        &self,
        ordinal: usize,
        d: &VectorDefinition,
    ) -> Outcome<Validated<VectorDefinition>> {
        let population = self.population;
        let resolution = match self.resolve(ordinal, d, |id| population.vector_base(id)) {
            Ok(resolution) => resolution,
            Err(diagnostics) => return Outcome::failure(diagnostics),
        };

        let dimension = resolution.base.dimension;
        let mut outcome = Outcome::new(Some(()), resolution.diagnostics);

        if self.name_dimension_heuristics && matches!(d.origin, Origin::Specialized(_)) {
            match d.identity.trailing_number() {
                Some(name_dimension) if name_dimension != dimension => outcome.push(report(
                    DiagnosticKind::VectorNameAndDimensionConflict {
                        name_dimension,
                        dimension,
                    },
                    &d.identity,
                    &d.location,
                )),
                _ => {}
            }
        }

        let mut definition = d.clone();

        definition.scalar = outcome.absorb(Self::optional_reference(
            &d.identity,
            d.scalar.as_ref(),
            |target| population.contains(QuantityKind::Scalar, target),
            |target| DiagnosticKind::TypeNotScalar { target },
        ));
        definition.quantity.difference = d
            .quantity
            .difference
            .as_ref()
            .and_then(|difference| outcome.absorb(self.vector_difference(d, difference, dimension)));
        definition.quantity.default_unit = outcome
            .absorb(resolve_default_unit(
                &d.identity,
                d.quantity.default_unit.as_ref(),
                resolution.unit,
            ))
            .flatten();

        let unit = resolution.unit.identity.clone();
        outcome.map(|()| Validated {
            definition,
            root: resolution.root,
            unit,
        })
    }

    /// A vector's difference has the vector's dimension.
    ///
    /// It is a vector or a vector group member of that dimension, or a vector
    /// group with a member of that dimension.
    fn vector_difference(
        &self,
        d: &VectorDefinition,
        difference: &Reference,
        dimension: u32,
    ) -> Outcome<Reference> {
        let target = &difference.identity;
        let population = self.population;

        let actual = if population.contains(QuantityKind::VectorGroup, target) {
            return Validity::check(
                population.member_of_dimension(target, dimension).is_some(),
                || {
                    report(
                        DiagnosticKind::VectorGroupLacksMemberOfDimension {
                            difference: target.clone(),
                            dimension,
                        },
                        &d.identity,
                        &difference.location,
                    )
                },
            )
            .transform(difference.clone());
        } else if let Some(member) = population.member(target) {
            Some(member.dimension)
        } else if population.contains(QuantityKind::Vector, target) {
            population
                .vector_base(target)
                .and_then(|root| root.origin.base())
                .map(|base| base.dimension)
        } else {
            return Outcome::failure(vec![report(
                DiagnosticKind::DifferenceNotVector {
                    difference: target.clone(),
                },
                &d.identity,
                &difference.location,
            )]);
        };

        match actual {
            Some(actual) if actual != dimension => Outcome::failure(vec![report(
                DiagnosticKind::DifferenceVectorInvalidDimension {
                    difference: target.clone(),
                    expected: dimension,
                    actual,
                },
                &d.identity,
                &difference.location,
            )]),
            _ => Outcome::success(difference.clone()),
        }
    }

    fn validate_group(
        &self,
        ordinal: usize,
        d: &GroupDefinition,
    ) -> Outcome<Validated<GroupDefinition>> {
        let population = self.population;
        let resolution = match self.resolve(ordinal, d, |id| population.group_base(id)) {
            Ok(resolution) => resolution,
            Err(diagnostics) => return Outcome::failure(diagnostics),
        };

        let mut outcome = Outcome::new(Some(()), resolution.diagnostics);
        let mut definition = d.clone();

        definition.scalar = outcome.absorb(Self::optional_reference(
            &d.identity,
            d.scalar.as_ref(),
            |target| population.contains(QuantityKind::Scalar, target),
            |target| DiagnosticKind::TypeNotScalar { target },
        ));
        definition.quantity.difference = outcome.absorb(Self::optional_reference(
            &d.identity,
            d.quantity.difference.as_ref(),
            |target| population.contains(QuantityKind::VectorGroup, target),
            |difference| DiagnosticKind::DifferenceNotVectorGroup { difference },
        ));
        definition.quantity.default_unit = outcome
            .absorb(resolve_default_unit(
                &d.identity,
                d.quantity.default_unit.as_ref(),
                resolution.unit,
            ))
            .flatten();

        let unit = resolution.unit.identity.clone();
        outcome.map(|()| Validated {
            definition,
            root: resolution.root,
            unit,
        })
    }

    /// Members inherit the unit of their group's root.
    fn validate_member(
        &self,
        ordinal: usize,
        d: &MemberDefinition,
    ) -> Outcome<Validated<MemberDefinition>> {
        let population = self.population;
        let group = &d.group;

        let validity = self
            .exclusivity(QuantityKind::VectorGroupMember, &d.identity, &d.location, ordinal)
            .and_then(|| {
                Validity::check(
                    population.contains(QuantityKind::VectorGroup, &group.identity),
                    || {
                        report(
                            DiagnosticKind::TypeNotVectorGroup {
                                target: group.identity.clone(),
                            },
                            &d.identity,
                            &group.location,
                        )
                    },
                )
            })
            .and_then(|| {
                let holder = population
                    .members_of(&group.identity)
                    .and_then(|members| members.get(&d.dimension));
                Validity::check(holder == Some(&d.identity), || {
                    report(
                        DiagnosticKind::VectorGroupAlreadyContainsDimension {
                            group: group.identity.clone(),
                            dimension: d.dimension,
                        },
                        &d.identity,
                        &d.location,
                    )
                })
            });
        if !validity.is_valid() {
            return Outcome::failure(validity.into_diagnostics());
        }

        let unit = population
            .group_base(&group.identity)
            .and_then(|root| root.origin.base())
            .and_then(|base| population.unit(&base.unit.identity));
        let Some(unit) = unit else {
            trace!(identity = %d.identity, "vector group of the member has no registered unit");
            return Outcome::failure(validity.into_diagnostics());
        };

        validity.transform(Validated {
            definition: d.clone(),
            root: d.identity.clone(),
            unit: unit.identity.clone(),
        })
    }
}

fn report(kind: DiagnosticKind, identity: &TypeIdentity, location: &SourceLocation) -> Diagnostic {
    Diagnostic::new(kind, identity.clone(), location.clone())
}

/// Fails with `kind`, or silently if the kind has no such diagnostic.
fn rejection(
    kind: Option<DiagnosticKind>,
    identity: &TypeIdentity,
    location: &SourceLocation,
) -> Validity {
    kind.map_or_else(Validity::invalid_silently, |kind| {
        Validity::invalid(report(kind, identity, location))
    })
}
