//! Diagnostics reported against declarations.
//!
//! Every problem found while processing or validating a declaration becomes a
//! [`Diagnostic`]: a [`DiagnosticKind`] (what went wrong, with its payload),
//! the identity of the declaration being examined, and the source location of
//! the offending property. Diagnostics are values; nothing in the pipeline
//! aborts on the first one.

use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::TypeIdentity;
use crate::kind::QuantityKind;
use crate::location::SourceLocation;

/// How serious a diagnostic is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Severity {
    /// Advisory; never affects whether a type is produced.
    Warning,
    /// A real problem in the declaration.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// What went wrong.
///
/// Codes are grouped by stage: `MTR01xx` per-declaration processing,
/// `MTR02xx` population validation, `MTR03xx` default unit resolution.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DiagnosticKind {
    // =========================================================================
    // Processing
    // =========================================================================
    /// A required property was never written.
    #[error("required property '{property}' was not specified")]
    MissingRequiredProperty {
        /// Name of the property.
        property: String,
    },

    /// The quantity being specialized was explicitly null.
    #[error("the specialized quantity must not be null")]
    NullOriginalQuantity,

    /// The unit of a base quantity was explicitly null.
    #[error("the unit must not be null")]
    NullUnit,

    /// The quantity described by a unit was explicitly null.
    #[error("the quantity described by the unit must not be null")]
    NullUnitQuantity,

    /// A vector dimension outside the supported range.
    #[error("vector dimension {dimension} is outside the supported range {min}..={max}")]
    InvalidVectorDimension {
        /// The declared dimension.
        dimension: i64,
        /// Smallest supported dimension.
        min: u32,
        /// Largest supported dimension.
        max: u32,
    },

    /// A cast behaviour value that names no known behaviour.
    #[error("'{value}' is not a recognized conversion behaviour for '{property}'")]
    UnrecognizedCastBehaviour {
        /// Name of the property.
        property: String,
        /// The raw value.
        value: i64,
    },

    /// The vector group of a member was explicitly null.
    #[error("the vector group of a member must not be null")]
    NullVectorGroup,

    /// The associated scalar was explicitly null.
    #[error("the associated scalar was explicitly null")]
    NullScalar,

    /// The associated vector was explicitly null.
    #[error("the associated vector was explicitly null")]
    NullVector,

    /// The difference quantity was explicitly null.
    #[error("the difference quantity was explicitly null")]
    NullDifferenceQuantity,

    /// A difference quantity was given while differences are disabled.
    #[error("difference quantity '{difference}' is specified, but differences are not implemented")]
    DifferenceDisabledButQuantitySpecified {
        /// The specified difference quantity.
        difference: TypeIdentity,
    },

    /// A default unit symbol was given without a default unit.
    #[error("default unit symbol '{symbol}' is specified without a default unit")]
    DefaultUnitSymbolWithoutName {
        /// The given symbol.
        symbol: String,
    },

    /// A default unit was given without a symbol.
    #[error("default unit '{name}' is specified without a symbol")]
    DefaultUnitNameWithoutSymbol {
        /// The given unit instance name.
        name: String,
    },

    /// The default unit was explicitly null.
    #[error("the default unit was explicitly null")]
    NullDefaultUnit,

    /// The default unit was empty.
    #[error("the default unit is empty")]
    EmptyDefaultUnit,

    /// The default unit symbol was explicitly null.
    #[error("the default unit symbol was explicitly null")]
    NullDefaultUnitSymbol,

    /// The default unit symbol was empty.
    #[error("the default unit symbol is empty")]
    EmptyDefaultUnitSymbol,

    /// A unit instance name that is not an identifier.
    #[error("'{name}' is not a valid unit instance name")]
    InvalidUnitInstanceName {
        /// The offending name.
        name: String,
    },

    /// Two instances of one unit share a name.
    #[error("unit instance '{name}' is declared more than once")]
    DuplicateUnitInstanceName {
        /// The repeated name.
        name: String,
    },

    /// A vector group whose name looks like a sized vector.
    #[error("the name of this vector group suggests a dimension of {dimension}")]
    VectorGroupNameSuggestsDimension {
        /// The dimension read from the name.
        dimension: u32,
    },

    /// A vector whose name suggests a different dimension.
    #[error("the name suggests dimension {name_dimension}, but the dimension is {dimension}")]
    VectorNameAndDimensionConflict {
        /// The dimension read from the name.
        name_dimension: u32,
        /// The declared or inherited dimension.
        dimension: u32,
    },

    // =========================================================================
    // Validation
    // =========================================================================
    /// The identity is also declared as a unit, or declared as a unit twice.
    #[error("the type is already defined as a unit")]
    TypeAlreadyUnit,

    /// The identity is also declared as a scalar, or declared as a scalar twice.
    #[error("the type is already defined as a scalar")]
    TypeAlreadyScalar,

    /// The identity is also declared as a vector, or declared as a vector twice.
    #[error("the type is already defined as a vector")]
    TypeAlreadyVector,

    /// The identity is also declared as a vector group, or declared as one twice.
    #[error("the type is already defined as a vector group")]
    TypeAlreadyVectorGroup,

    /// The identity is also declared as a vector group member, or declared as one twice.
    #[error("the type is already defined as a vector group member")]
    TypeAlreadyVectorGroupMember,

    /// The specialized quantity is not a scalar.
    #[error("'{original}' is not a scalar quantity")]
    OriginalNotScalar {
        /// The specialized quantity.
        original: TypeIdentity,
    },

    /// The specialized quantity is not a vector.
    #[error("'{original}' is not a vector quantity")]
    OriginalNotVector {
        /// The specialized quantity.
        original: TypeIdentity,
    },

    /// The specialized quantity is not a vector group.
    #[error("'{original}' is not a vector group")]
    OriginalNotVectorGroup {
        /// The specialized quantity.
        original: TypeIdentity,
    },

    /// The unit of a base quantity is not a unit.
    #[error("'{target}' is not a unit")]
    TypeNotUnit {
        /// The referenced type.
        target: TypeIdentity,
    },

    /// The quantity described by a unit is not a scalar.
    #[error("'{quantity}' is not a scalar quantity, and cannot be described by a unit")]
    UnitQuantityNotScalar {
        /// The referenced quantity.
        quantity: TypeIdentity,
    },

    /// The specialization chain of a scalar never reaches a base scalar.
    #[error("the scalar specialization chain through '{original}' does not reach a base scalar")]
    RootScalarNotResolved {
        /// The specialized quantity.
        original: TypeIdentity,
    },

    /// The specialization chain of a vector never reaches a base vector.
    #[error("the vector specialization chain through '{original}' does not reach a base vector")]
    RootVectorNotResolved {
        /// The specialized quantity.
        original: TypeIdentity,
    },

    /// The specialization chain of a vector group never reaches a base group.
    #[error("the vector group specialization chain through '{original}' does not reach a base group")]
    RootVectorGroupNotResolved {
        /// The specialized quantity.
        original: TypeIdentity,
    },

    /// A scalar uses unit bias, but its unit has no bias term.
    #[error("unit '{unit}' does not include a bias term")]
    UnitNotIncludingBiasTerm {
        /// The unit of the scalar.
        unit: TypeIdentity,
    },

    /// The associated scalar is not a scalar.
    #[error("'{target}' is not a scalar quantity")]
    TypeNotScalar {
        /// The referenced type.
        target: TypeIdentity,
    },

    /// The associated vector is not a vector.
    #[error("'{target}' is not a vector quantity")]
    TypeNotVector {
        /// The referenced type.
        target: TypeIdentity,
    },

    /// The difference of a scalar is not a scalar.
    #[error("difference quantity '{difference}' is not a scalar quantity")]
    DifferenceNotScalar {
        /// The referenced difference.
        difference: TypeIdentity,
    },

    /// The difference of a vector is not a vector or vector group.
    #[error("difference quantity '{difference}' is not a vector quantity")]
    DifferenceNotVector {
        /// The referenced difference.
        difference: TypeIdentity,
    },

    /// The difference of a vector has another dimension.
    #[error("difference quantity '{difference}' has dimension {actual}, expected {expected}")]
    DifferenceVectorInvalidDimension {
        /// The referenced difference.
        difference: TypeIdentity,
        /// Dimension of the vector.
        expected: u32,
        /// Dimension of the difference.
        actual: u32,
    },

    /// The difference of a vector group is not a vector group.
    #[error("difference quantity '{difference}' is not a vector group")]
    DifferenceNotVectorGroup {
        /// The referenced difference.
        difference: TypeIdentity,
    },

    /// The vector group of a member is not a vector group.
    #[error("'{target}' is not a vector group")]
    TypeNotVectorGroup {
        /// The referenced type.
        target: TypeIdentity,
    },

    /// Another member of the group already has this dimension.
    #[error("vector group '{group}' already has a member of dimension {dimension}")]
    VectorGroupAlreadyContainsDimension {
        /// The vector group.
        group: TypeIdentity,
        /// The repeated dimension.
        dimension: u32,
    },

    /// The difference of a vector is a group with no member of its dimension.
    #[error("vector group '{difference}' has no member of dimension {dimension}")]
    VectorGroupLacksMemberOfDimension {
        /// The referenced difference.
        difference: TypeIdentity,
        /// Dimension of the vector.
        dimension: u32,
    },

    // =========================================================================
    // Default unit
    // =========================================================================
    /// The default unit names no instance of the unit.
    #[error("'{name}' is not an instance of unit '{unit}'")]
    UnrecognizedDefaultUnit {
        /// The given unit instance name.
        name: String,
        /// The unit of the quantity.
        unit: TypeIdentity,
    },

    /// The default unit symbol differs from the symbol of the instance.
    #[error("default unit symbol '{symbol}' does not match '{expected}', the symbol of '{name}'")]
    DefaultUnitSymbolMismatch {
        /// The given symbol.
        symbol: String,
        /// The symbol declared by the instance.
        expected: String,
        /// The unit instance.
        name: String,
    },
}

impl DiagnosticKind {
    /// Returns the exclusivity diagnostic for an identity already taken by `kind`.
    #[must_use]
    pub const fn already_defined_as(kind: QuantityKind) -> Self {
        match kind {
            QuantityKind::Unit => Self::TypeAlreadyUnit,
            QuantityKind::Scalar => Self::TypeAlreadyScalar,
            QuantityKind::Vector => Self::TypeAlreadyVector,
            QuantityKind::VectorGroup => Self::TypeAlreadyVectorGroup,
            QuantityKind::VectorGroupMember => Self::TypeAlreadyVectorGroupMember,
        }
    }

    /// Returns the diagnostic for a specialization of a type not of `kind`.
    ///
    /// Units and members are never specialized; `None` for those kinds.
    #[must_use]
    pub fn original_not(kind: QuantityKind, original: TypeIdentity) -> Option<Self> {
        match kind {
            QuantityKind::Unit | QuantityKind::VectorGroupMember => None,
            QuantityKind::Scalar => Some(Self::OriginalNotScalar { original }),
            QuantityKind::Vector => Some(Self::OriginalNotVector { original }),
            QuantityKind::VectorGroup => Some(Self::OriginalNotVectorGroup { original }),
        }
    }

    /// Returns the diagnostic for an unresolved chain of `kind`.
    #[must_use]
    pub fn root_not_resolved(kind: QuantityKind, original: TypeIdentity) -> Option<Self> {
        match kind {
            QuantityKind::Unit | QuantityKind::VectorGroupMember => None,
            QuantityKind::Scalar => Some(Self::RootScalarNotResolved { original }),
            QuantityKind::Vector => Some(Self::RootVectorNotResolved { original }),
            QuantityKind::VectorGroup => Some(Self::RootVectorGroupNotResolved { original }),
        }
    }

    /// Returns the stable code of this diagnostic, such as `MTR0201`.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingRequiredProperty { .. } => "MTR0101",
            Self::NullOriginalQuantity => "MTR0102",
            Self::NullUnit => "MTR0103",
            Self::NullUnitQuantity => "MTR0104",
            Self::InvalidVectorDimension { .. } => "MTR0105",
            Self::UnrecognizedCastBehaviour { .. } => "MTR0106",
            Self::NullScalar => "MTR0107",
            Self::NullVector => "MTR0108",
            Self::NullDifferenceQuantity => "MTR0109",
            Self::DifferenceDisabledButQuantitySpecified { .. } => "MTR0110",
            Self::DefaultUnitSymbolWithoutName { .. } => "MTR0111",
            Self::DefaultUnitNameWithoutSymbol { .. } => "MTR0112",
            Self::NullDefaultUnit => "MTR0113",
            Self::EmptyDefaultUnit => "MTR0114",
            Self::NullDefaultUnitSymbol => "MTR0115",
            Self::EmptyDefaultUnitSymbol => "MTR0116",
            Self::InvalidUnitInstanceName { .. } => "MTR0117",
            Self::DuplicateUnitInstanceName { .. } => "MTR0118",
            Self::VectorGroupNameSuggestsDimension { .. } => "MTR0119",
            Self::VectorNameAndDimensionConflict { .. } => "MTR0120",
            Self::NullVectorGroup => "MTR0121",
            Self::TypeAlreadyUnit => "MTR0201",
            Self::TypeAlreadyScalar => "MTR0202",
            Self::TypeAlreadyVector => "MTR0203",
            Self::TypeAlreadyVectorGroup => "MTR0204",
            Self::OriginalNotScalar { .. } => "MTR0205",
            Self::OriginalNotVector { .. } => "MTR0206",
            Self::OriginalNotVectorGroup { .. } => "MTR0207",
            Self::TypeNotUnit { .. } => "MTR0208",
            Self::UnitQuantityNotScalar { .. } => "MTR0209",
            Self::RootScalarNotResolved { .. } => "MTR0210",
            Self::RootVectorNotResolved { .. } => "MTR0211",
            Self::RootVectorGroupNotResolved { .. } => "MTR0212",
            Self::UnitNotIncludingBiasTerm { .. } => "MTR0213",
            Self::TypeNotScalar { .. } => "MTR0214",
            Self::TypeNotVector { .. } => "MTR0215",
            Self::DifferenceNotScalar { .. } => "MTR0216",
            Self::DifferenceNotVector { .. } => "MTR0217",
            Self::DifferenceVectorInvalidDimension { .. } => "MTR0218",
            Self::DifferenceNotVectorGroup { .. } => "MTR0219",
            Self::TypeAlreadyVectorGroupMember => "MTR0220",
            Self::TypeNotVectorGroup { .. } => "MTR0221",
            Self::VectorGroupAlreadyContainsDimension { .. } => "MTR0222",
            Self::VectorGroupLacksMemberOfDimension { .. } => "MTR0223",
            Self::UnrecognizedDefaultUnit { .. } => "MTR0301",
            Self::DefaultUnitSymbolMismatch { .. } => "MTR0302",
        }
    }

    /// Returns the name of this diagnostic, such as `TypeNotScalar`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MissingRequiredProperty { .. } => "MissingRequiredProperty",
            Self::NullOriginalQuantity => "NullOriginalQuantity",
            Self::NullUnit => "NullUnit",
            Self::NullUnitQuantity => "NullUnitQuantity",
            Self::InvalidVectorDimension { .. } => "InvalidVectorDimension",
            Self::UnrecognizedCastBehaviour { .. } => "UnrecognizedCastBehaviour",
            Self::NullScalar => "NullScalar",
            Self::NullVector => "NullVector",
            Self::NullDifferenceQuantity => "NullDifferenceQuantity",
            Self::DifferenceDisabledButQuantitySpecified { .. } => {
                "DifferenceDisabledButQuantitySpecified"
            }
            Self::DefaultUnitSymbolWithoutName { .. } => "DefaultUnitSymbolWithoutName",
            Self::DefaultUnitNameWithoutSymbol { .. } => "DefaultUnitNameWithoutSymbol",
            Self::NullDefaultUnit => "NullDefaultUnit",
            Self::EmptyDefaultUnit => "EmptyDefaultUnit",
            Self::NullDefaultUnitSymbol => "NullDefaultUnitSymbol",
            Self::EmptyDefaultUnitSymbol => "EmptyDefaultUnitSymbol",
            Self::InvalidUnitInstanceName { .. } => "InvalidUnitInstanceName",
            Self::DuplicateUnitInstanceName { .. } => "DuplicateUnitInstanceName",
            Self::VectorGroupNameSuggestsDimension { .. } => "VectorGroupNameSuggestsDimension",
            Self::VectorNameAndDimensionConflict { .. } => "VectorNameAndDimensionConflict",
            Self::NullVectorGroup => "NullVectorGroup",
            Self::TypeAlreadyUnit => "TypeAlreadyUnit",
            Self::TypeAlreadyScalar => "TypeAlreadyScalar",
            Self::TypeAlreadyVector => "TypeAlreadyVector",
            Self::TypeAlreadyVectorGroup => "TypeAlreadyVectorGroup",
            Self::OriginalNotScalar { .. } => "OriginalNotScalar",
            Self::OriginalNotVector { .. } => "OriginalNotVector",
            Self::OriginalNotVectorGroup { .. } => "OriginalNotVectorGroup",
            Self::TypeNotUnit { .. } => "TypeNotUnit",
            Self::UnitQuantityNotScalar { .. } => "UnitQuantityNotScalar",
            Self::RootScalarNotResolved { .. } => "RootScalarNotResolved",
            Self::RootVectorNotResolved { .. } => "RootVectorNotResolved",
            Self::RootVectorGroupNotResolved { .. } => "RootVectorGroupNotResolved",
            Self::UnitNotIncludingBiasTerm { .. } => "UnitNotIncludingBiasTerm",
            Self::TypeNotScalar { .. } => "TypeNotScalar",
            Self::TypeNotVector { .. } => "TypeNotVector",
            Self::DifferenceNotScalar { .. } => "DifferenceNotScalar",
            Self::DifferenceNotVector { .. } => "DifferenceNotVector",
            Self::DifferenceVectorInvalidDimension { .. } => "DifferenceVectorInvalidDimension",
            Self::DifferenceNotVectorGroup { .. } => "DifferenceNotVectorGroup",
            Self::TypeAlreadyVectorGroupMember => "TypeAlreadyVectorGroupMember",
            Self::TypeNotVectorGroup { .. } => "TypeNotVectorGroup",
            Self::VectorGroupAlreadyContainsDimension { .. } => {
                "VectorGroupAlreadyContainsDimension"
            }
            Self::VectorGroupLacksMemberOfDimension { .. } => "VectorGroupLacksMemberOfDimension",
            Self::UnrecognizedDefaultUnit { .. } => "UnrecognizedDefaultUnit",
            Self::DefaultUnitSymbolMismatch { .. } => "DefaultUnitSymbolMismatch",
        }
    }

    /// Returns the severity of this diagnostic.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::DifferenceDisabledButQuantitySpecified { .. }
            | Self::VectorGroupNameSuggestsDimension { .. }
            | Self::VectorNameAndDimensionConflict { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A problem reported against one declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// The declaration being examined.
    pub identity: TypeIdentity,
    /// Where the offending property or declaration was written.
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    /// Creates a diagnostic attached to a source location.
    #[must_use]
    pub fn new(kind: DiagnosticKind, identity: TypeIdentity, location: SourceLocation) -> Self {
        Self {
            kind,
            identity,
            location: Some(location),
        }
    }

    /// Creates a diagnostic with no source location.
    #[must_use]
    pub fn unlocated(kind: DiagnosticKind, identity: TypeIdentity) -> Self {
        Self {
            kind,
            identity,
            location: None,
        }
    }

    /// Returns the stable code of the kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Returns the severity of the kind.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Returns true for error-severity diagnostics.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    /// Canonical report order: location (unlocated last), identity, code.
    #[must_use]
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        let by_location = match (&self.location, &other.location) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_location
            .then_with(|| self.identity.cmp(&other.identity))
            .then_with(|| self.code().cmp(other.code()))
            .then_with(|| self.kind.to_string().cmp(&other.kind.to_string()))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }
        write!(
            f,
            "{}[{}] {}: {}",
            self.severity(),
            self.code(),
            self.identity,
            self.kind
        )
    }
}

/// Sorts diagnostics into canonical report order.
pub fn sort_canonically(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(Diagnostic::canonical_cmp);
}
