//! Per-declaration processing.
//!
//! [`process`] turns one raw [`Declaration`] into a [`Definition`] using only
//! the declaration itself. It never looks at other declarations, so every
//! declaration can be processed independently and in parallel.
//!
//! Problems fall into two tiers:
//!
//! - **Fatal**: a required property is missing or explicitly null, or the
//!   vector dimension is out of range. No definition is produced, and only the
//!   fatal diagnostics are reported.
//! - **Non-fatal**: the offending optional property is dropped or defaulted,
//!   a diagnostic is reported, and the definition is still produced.

use std::collections::BTreeSet;

use metrology_foundation::{Diagnostic, DiagnosticKind, Outcome, SourceLocation, TypeIdentity};
use tracing::trace;

use crate::declaration::{
    CastProperties, Declaration, InheritanceProperties, QuantityProperties, ScalarDeclaration,
    SpecializedScalarDeclaration, SpecializedVectorDeclaration, SpecializedVectorGroupDeclaration,
    UnitDeclaration, UnitInstanceDeclaration, VectorDeclaration, VectorGroupDeclaration,
    VectorGroupMemberDeclaration,
};
use crate::definition::{
    Casts, ConversionOperatorBehaviour, DefaultUnit, Definition, GroupBase, GroupDefinition,
    Inheritance, MemberDefinition, Origin, QuantityOptions, Reference, ScalarBase, ScalarDefinition, Specialization,
    UnitDefinition, UnitInstance, VectorBase, VectorDefinition,
};
use crate::options::ProcessorOptions;
use crate::property::Property;

/// Processes one declaration into a definition.
///
/// The returned outcome has a value iff no fatal problem was found.
#[must_use]
pub fn process(declaration: &Declaration, options: &ProcessorOptions) -> Outcome<Definition> {
    let mut context = Context::new(declaration.identity(), declaration.location());

    let definition = match declaration {
        Declaration::Unit(d) => process_unit(&mut context, d).map(Definition::Unit),
        Declaration::Scalar(d) => process_scalar(&mut context, d).map(Definition::Scalar),
        Declaration::SpecializedScalar(d) => {
            process_specialized_scalar(&mut context, d).map(Definition::Scalar)
        }
        Declaration::Vector(d) => process_vector(&mut context, d, options).map(Definition::Vector),
        Declaration::SpecializedVector(d) => {
            process_specialized_vector(&mut context, d).map(Definition::Vector)
        }
        Declaration::VectorGroup(d) => {
            process_group(&mut context, d, options).map(Definition::Group)
        }
        Declaration::SpecializedVectorGroup(d) => {
            process_specialized_group(&mut context, d, options).map(Definition::Group)
        }
        Declaration::VectorGroupMember(d) => {
            process_member(&mut context, d, options).map(Definition::Member)
        }
    };

    trace!(
        identity = %declaration.identity(),
        kind = %declaration.kind(),
        produced = definition.is_some(),
        diagnostics = context.diagnostics.len(),
        "processed declaration"
    );

    Outcome::new(definition, context.diagnostics)
}

// =============================================================================
// Context
// =============================================================================

/// Diagnostics collected while processing one declaration.
struct Context<'a> {
    identity: &'a TypeIdentity,
    location: &'a SourceLocation,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Context<'a> {
    fn new(identity: &'a TypeIdentity, location: &'a SourceLocation) -> Self {
        Self {
            identity,
            location,
            diagnostics: Vec::new(),
        }
    }

    /// Reports at `location`, or at the declaration if the property has none.
    fn report(&mut self, kind: DiagnosticKind, location: Option<&SourceLocation>) {
        let location = location.unwrap_or(self.location).clone();
        self.diagnostics
            .push(Diagnostic::new(kind, self.identity.clone(), location));
    }

    /// Returns true if a fatal diagnostic was reported so far.
    fn has_fatal(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Reads a required property.
    ///
    /// Missing reports `MissingRequiredProperty`; null reports `null`.
    fn required<T: Clone>(
        &mut self,
        property: &Property<T>,
        name: &str,
        null: DiagnosticKind,
    ) -> Option<(T, SourceLocation)> {
        match property {
            Property::Default => {
                self.report(
                    DiagnosticKind::MissingRequiredProperty {
                        property: name.to_string(),
                    },
                    None,
                );
                None
            }
            Property::Null(location) => {
                self.report(null, Some(location));
                None
            }
            Property::Set(value, location) => Some((value.clone(), location.clone())),
        }
    }

    fn required_reference(
        &mut self,
        property: &Property<TypeIdentity>,
        name: &str,
        null: DiagnosticKind,
    ) -> Option<Reference> {
        self.required(property, name, null)
            .map(|(identity, location)| Reference::new(identity, location))
    }

    /// Reads an optional reference; an explicit null reports `null` and is dropped.
    fn optional_reference(
        &mut self,
        property: &Property<TypeIdentity>,
        null: DiagnosticKind,
    ) -> Option<Reference> {
        match property {
            Property::Default => None,
            Property::Null(location) => {
                self.report(null, Some(location));
                None
            }
            Property::Set(identity, location) => {
                Some(Reference::new(identity.clone(), location.clone()))
            }
        }
    }
}

// =============================================================================
// Shared Blocks
// =============================================================================

fn inheritance(properties: &InheritanceProperties) -> Inheritance {
    Inheritance {
        derivations: properties.inherit_derivations.or(true),
        constants: properties.inherit_constants.or(true),
        conversions: properties.inherit_conversions.or(true),
        units: properties.inherit_units.or(true),
    }
}

fn cast(
    context: &mut Context<'_>,
    property: &Property<i64>,
    name: &str,
    default: ConversionOperatorBehaviour,
) -> ConversionOperatorBehaviour {
    match property.located() {
        Some((&value, location)) => {
            ConversionOperatorBehaviour::from_raw(value).unwrap_or_else(|| {
                context.report(
                    DiagnosticKind::UnrecognizedCastBehaviour {
                        property: name.to_string(),
                        value,
                    },
                    Some(location),
                );
                default
            })
        }
        None => default,
    }
}

fn casts(context: &mut Context<'_>, properties: &CastProperties) -> Casts {
    let defaults = Casts::default();
    Casts {
        forwards: cast(
            context,
            &properties.forwards,
            "ForwardsCastOperatorBehaviour",
            defaults.forwards,
        ),
        backwards: cast(
            context,
            &properties.backwards,
            "BackwardsCastOperatorBehaviour",
            defaults.backwards,
        ),
    }
}

fn specialization(
    context: &mut Context<'_>,
    original: Reference,
    inheritance_properties: &InheritanceProperties,
    cast_properties: &CastProperties,
) -> Specialization {
    Specialization {
        original,
        inheritance: inheritance(inheritance_properties),
        casts: casts(context, cast_properties),
    }
}

fn quantity_options(context: &mut Context<'_>, properties: &QuantityProperties) -> QuantityOptions {
    let implement_sum = properties.implement_sum.value().copied();
    let implement_difference = properties.implement_difference.value().copied();

    let difference =
        context.optional_reference(&properties.difference, DiagnosticKind::NullDifferenceQuantity);
    if let (Some(difference), Some(false)) = (&difference, implement_difference) {
        context.report(
            DiagnosticKind::DifferenceDisabledButQuantitySpecified {
                difference: difference.identity.clone(),
            },
            Some(&difference.location),
        );
    }

    QuantityOptions {
        implement_sum,
        implement_difference,
        difference,
        default_unit: default_unit(context, properties),
    }
}

/// The default unit name and symbol must be given together, and both non-empty.
fn default_unit(context: &mut Context<'_>, properties: &QuantityProperties) -> Option<DefaultUnit> {
    let name = &properties.default_unit_name;
    let symbol = &properties.default_unit_symbol;

    match (name.is_explicit(), symbol.is_explicit()) {
        (false, false) => return None,
        (false, true) => {
            context.report(
                DiagnosticKind::DefaultUnitSymbolWithoutName {
                    symbol: symbol.value().cloned().unwrap_or_default(),
                },
                symbol.location(),
            );
            return None;
        }
        (true, false) => {
            context.report(
                DiagnosticKind::DefaultUnitNameWithoutSymbol {
                    name: name.value().cloned().unwrap_or_default(),
                },
                name.location(),
            );
            return None;
        }
        (true, true) => {}
    }

    let (name, location) = match name {
        Property::Set(value, location) if !value.is_empty() => (value.clone(), location.clone()),
        Property::Set(_, location) => {
            context.report(DiagnosticKind::EmptyDefaultUnit, Some(location));
            return None;
        }
        Property::Null(location) => {
            context.report(DiagnosticKind::NullDefaultUnit, Some(location));
            return None;
        }
        Property::Default => return None,
    };

    let symbol = match symbol {
        Property::Set(value, _) if !value.is_empty() => value.clone(),
        Property::Set(_, location) => {
            context.report(DiagnosticKind::EmptyDefaultUnitSymbol, Some(location));
            return None;
        }
        Property::Null(location) => {
            context.report(DiagnosticKind::NullDefaultUnitSymbol, Some(location));
            return None;
        }
        Property::Default => return None,
    };

    Some(DefaultUnit {
        name,
        symbol: Some(symbol),
        location,
    })
}

fn group_name_heuristic(context: &mut Context<'_>, options: &ProcessorOptions) {
    if !options.name_dimension_heuristics {
        return;
    }
    if let Some(dimension) = context.identity.trailing_number() {
        context.report(
            DiagnosticKind::VectorGroupNameSuggestsDimension { dimension },
            None,
        );
    }
}

/// Checks a raw dimension against the supported range.
fn vector_dimension(
    context: &mut Context<'_>,
    raw: i64,
    location: &SourceLocation,
    options: &ProcessorOptions,
) -> Option<u32> {
    match u32::try_from(raw) {
        Ok(dimension) if options.accepts_dimension(raw) => Some(dimension),
        _ => {
            context.report(
                DiagnosticKind::InvalidVectorDimension {
                    dimension: raw,
                    min: options.min_vector_dimension,
                    max: options.max_vector_dimension,
                },
                Some(location),
            );
            None
        }
    }
}

/// Warns when the name ends in a number other than the dimension.
fn name_dimension_conflict(
    context: &mut Context<'_>,
    dimension: u32,
    location: &SourceLocation,
    options: &ProcessorOptions,
) {
    if !options.name_dimension_heuristics {
        return;
    }
    match context.identity.trailing_number() {
        Some(name_dimension) if name_dimension != dimension => context.report(
            DiagnosticKind::VectorNameAndDimensionConflict {
                name_dimension,
                dimension,
            },
            Some(location),
        ),
        _ => {}
    }
}

// =============================================================================
// Units
// =============================================================================

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn unit_instances(
    context: &mut Context<'_>,
    declarations: &[UnitInstanceDeclaration],
) -> Vec<UnitInstance> {
    let mut seen = BTreeSet::new();
    let mut instances = Vec::with_capacity(declarations.len());

    for declaration in declarations {
        if !is_identifier(&declaration.name) {
            context.report(
                DiagnosticKind::InvalidUnitInstanceName {
                    name: declaration.name.clone(),
                },
                Some(&declaration.location),
            );
            continue;
        }
        if !seen.insert(declaration.name.as_str()) {
            context.report(
                DiagnosticKind::DuplicateUnitInstanceName {
                    name: declaration.name.clone(),
                },
                Some(&declaration.location),
            );
            continue;
        }

        let plural = match declaration.plural.value() {
            Some(plural) if !plural.is_empty() => plural.clone(),
            _ => format!("{}s", declaration.name),
        };
        let symbol = declaration
            .symbol
            .value()
            .filter(|symbol| !symbol.is_empty())
            .cloned();

        instances.push(UnitInstance {
            name: declaration.name.clone(),
            plural,
            symbol,
            location: declaration.location.clone(),
        });
    }

    instances
}

fn process_unit(context: &mut Context<'_>, d: &UnitDeclaration) -> Option<UnitDefinition> {
    let quantity =
        context.required_reference(&d.quantity, "Quantity", DiagnosticKind::NullUnitQuantity)?;

    Some(UnitDefinition {
        identity: d.identity.clone(),
        location: d.location.clone(),
        quantity,
        bias_term: d.bias_term.or(false),
        instances: unit_instances(context, &d.instances),
    })
}

// =============================================================================
// Scalars
// =============================================================================

fn process_scalar(context: &mut Context<'_>, d: &ScalarDeclaration) -> Option<ScalarDefinition> {
    let unit = context.required_reference(&d.unit, "Unit", DiagnosticKind::NullUnit)?;

    let vector = context.optional_reference(&d.vector, DiagnosticKind::NullVector);
    let quantity = quantity_options(context, &d.quantity);

    Some(ScalarDefinition {
        identity: d.identity.clone(),
        location: d.location.clone(),
        origin: Origin::Base(ScalarBase {
            unit,
            use_unit_bias: d.use_unit_bias.or(false),
        }),
        vector,
        quantity,
    })
}

fn process_specialized_scalar(
    context: &mut Context<'_>,
    d: &SpecializedScalarDeclaration,
) -> Option<ScalarDefinition> {
    let original = context.required_reference(
        &d.original,
        "OriginalQuantity",
        DiagnosticKind::NullOriginalQuantity,
    )?;

    let specialization = specialization(context, original, &d.inheritance, &d.casts);
    let vector = context.optional_reference(&d.vector, DiagnosticKind::NullVector);
    let quantity = quantity_options(context, &d.quantity);

    Some(ScalarDefinition {
        identity: d.identity.clone(),
        location: d.location.clone(),
        origin: Origin::Specialized(specialization),
        vector,
        quantity,
    })
}

// =============================================================================
// Vectors
// =============================================================================

fn process_vector(
    context: &mut Context<'_>,
    d: &VectorDeclaration,
    options: &ProcessorOptions,
) -> Option<VectorDefinition> {
    let unit = context.required_reference(&d.unit, "Unit", DiagnosticKind::NullUnit);
    let dimension = context.required(
        &d.dimension,
        "Dimension",
        DiagnosticKind::MissingRequiredProperty {
            property: "Dimension".to_string(),
        },
    );
    if context.has_fatal() {
        return None;
    }
    let (unit, (raw_dimension, dimension_location)) = unit.zip(dimension)?;
    let dimension = vector_dimension(context, raw_dimension, &dimension_location, options)?;
    name_dimension_conflict(context, dimension, &dimension_location, options);

    let scalar = context.optional_reference(&d.scalar, DiagnosticKind::NullScalar);
    let quantity = quantity_options(context, &d.quantity);

    Some(VectorDefinition {
        identity: d.identity.clone(),
        location: d.location.clone(),
        origin: Origin::Base(VectorBase { unit, dimension }),
        scalar,
        quantity,
    })
}

fn process_specialized_vector(
    context: &mut Context<'_>,
    d: &SpecializedVectorDeclaration,
) -> Option<VectorDefinition> {
    let original = context.required_reference(
        &d.original,
        "OriginalQuantity",
        DiagnosticKind::NullOriginalQuantity,
    )?;

    let specialization = specialization(context, original, &d.inheritance, &d.casts);
    let scalar = context.optional_reference(&d.scalar, DiagnosticKind::NullScalar);
    let quantity = quantity_options(context, &d.quantity);

    Some(VectorDefinition {
        identity: d.identity.clone(),
        location: d.location.clone(),
        origin: Origin::Specialized(specialization),
        scalar,
        quantity,
    })
}

// =============================================================================
// Vector Groups
// =============================================================================

fn process_group(
    context: &mut Context<'_>,
    d: &VectorGroupDeclaration,
    options: &ProcessorOptions,
) -> Option<GroupDefinition> {
    let unit = context.required_reference(&d.unit, "Unit", DiagnosticKind::NullUnit)?;

    group_name_heuristic(context, options);
    let scalar = context.optional_reference(&d.scalar, DiagnosticKind::NullScalar);
    let quantity = quantity_options(context, &d.quantity);

    Some(GroupDefinition {
        identity: d.identity.clone(),
        location: d.location.clone(),
        origin: Origin::Base(GroupBase { unit }),
        scalar,
        quantity,
    })
}

fn process_specialized_group(
    context: &mut Context<'_>,
    d: &SpecializedVectorGroupDeclaration,
    options: &ProcessorOptions,
) -> Option<GroupDefinition> {
    let original = context.required_reference(
        &d.original,
        "OriginalQuantity",
        DiagnosticKind::NullOriginalQuantity,
    )?;

    let specialization = specialization(context, original, &d.inheritance, &d.casts);
    group_name_heuristic(context, options);
    let scalar = context.optional_reference(&d.scalar, DiagnosticKind::NullScalar);
    let quantity = quantity_options(context, &d.quantity);

    Some(GroupDefinition {
        identity: d.identity.clone(),
        location: d.location.clone(),
        origin: Origin::Specialized(specialization),
        scalar,
        quantity,
    })
}

// =============================================================================
// Vector Group Members
// =============================================================================

/// A member without a dimension takes the trailing number of its name.
fn process_member(
    context: &mut Context<'_>,
    d: &VectorGroupMemberDeclaration,
    options: &ProcessorOptions,
) -> Option<MemberDefinition> {
    let group =
        context.required_reference(&d.group, "VectorGroup", DiagnosticKind::NullVectorGroup);

    let explicit = d.dimension.located().map(|(&raw, location)| (raw, location.clone()));
    let dimension = explicit.clone().or_else(|| {
        d.identity
            .trailing_number()
            .map(|inferred| (i64::from(inferred), d.location.clone()))
    });
    if dimension.is_none() {
        context.report(
            DiagnosticKind::MissingRequiredProperty {
                property: "Dimension".to_string(),
            },
            None,
        );
    }
    if context.has_fatal() {
        return None;
    }
    let (group, (raw_dimension, dimension_location)) = group.zip(dimension)?;

    let dimension = vector_dimension(context, raw_dimension, &dimension_location, options)?;
    if explicit.is_some() {
        name_dimension_conflict(context, dimension, &dimension_location, options);
    }

    Some(MemberDefinition {
        identity: d.identity.clone(),
        location: d.location.clone(),
        group,
        dimension,
        inheritance: inheritance(&d.inheritance),
    })
}
