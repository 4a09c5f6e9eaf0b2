//! Raw quantity declarations.
//!
//! A [`Declaration`] is what syntactic extraction hands over: one per
//! annotated source type, every property still in its raw three-state form.
//! Nothing here has been checked; see [`crate::processor`].

use metrology_foundation::{QuantityKind, SourceLocation, TypeIdentity};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::property::Property;

// =============================================================================
// Shared Property Blocks
// =============================================================================

/// Properties shared by scalars, vectors, and vector groups.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuantityProperties {
    /// Whether `a + b` is generated. Defaults to true.
    pub implement_sum: Property<bool>,
    /// Whether `a - b` is generated. Defaults to true.
    pub implement_difference: Property<bool>,
    /// The quantity produced by `a - b`. Defaults to the quantity itself.
    pub difference: Property<TypeIdentity>,
    /// Name of the unit instance used when none is given.
    pub default_unit_name: Property<String>,
    /// Symbol of the default unit instance.
    pub default_unit_symbol: Property<String>,
}

/// What a specialization inherits from the quantity it specializes.
///
/// Every flag defaults to true.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InheritanceProperties {
    /// Inherit derived-quantity operators.
    pub inherit_derivations: Property<bool>,
    /// Inherit named constants.
    pub inherit_constants: Property<bool>,
    /// Inherit conversion operators.
    pub inherit_conversions: Property<bool>,
    /// Inherit the set of included units.
    pub inherit_units: Property<bool>,
}

/// Conversion operators between a specialization and its original.
///
/// Values are raw integers, checked during processing.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastProperties {
    /// Conversion from the original to the specialization.
    pub forwards: Property<i64>,
    /// Conversion from the specialization to the original.
    pub backwards: Property<i64>,
}

// =============================================================================
// Units
// =============================================================================

/// One named instance of a unit, such as `Metre` of `UnitOfLength`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitInstanceDeclaration {
    /// Singular name.
    pub name: String,
    /// Plural name. Defaults to the name with an `s` appended.
    pub plural: Property<String>,
    /// Printed symbol, such as `m`.
    pub symbol: Property<String>,
    /// Where the instance was declared.
    pub location: SourceLocation,
}

impl UnitInstanceDeclaration {
    /// Creates an instance with default plural and no symbol.
    #[must_use]
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            plural: Property::Default,
            symbol: Property::Default,
            location,
        }
    }

    /// Sets the symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Property::set(symbol.into(), self.location.clone());
        self
    }
}

/// Declaration of a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitDeclaration {
    /// The declared type.
    pub identity: TypeIdentity,
    /// Where the type was declared.
    pub location: SourceLocation,
    /// The scalar this unit measures. Required.
    pub quantity: Property<TypeIdentity>,
    /// Whether values carry a bias, as for temperatures. Defaults to false.
    pub bias_term: Property<bool>,
    /// Named instances.
    pub instances: Vec<UnitInstanceDeclaration>,
}

impl UnitDeclaration {
    /// Creates a declaration with every property defaulted.
    #[must_use]
    pub fn new(identity: TypeIdentity, location: SourceLocation) -> Self {
        Self {
            identity,
            location,
            quantity: Property::Default,
            bias_term: Property::Default,
            instances: Vec::new(),
        }
    }
}

// =============================================================================
// Scalars
// =============================================================================

/// Declaration of a base scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScalarDeclaration {
    /// The declared type.
    pub identity: TypeIdentity,
    /// Where the type was declared.
    pub location: SourceLocation,
    /// The unit of the scalar. Required.
    pub unit: Property<TypeIdentity>,
    /// Whether the scalar includes the unit bias. Defaults to false.
    pub use_unit_bias: Property<bool>,
    /// The vector quantity with this scalar as magnitude.
    pub vector: Property<TypeIdentity>,
    /// Shared quantity properties.
    pub quantity: QuantityProperties,
}

impl ScalarDeclaration {
    /// Creates a declaration with every property defaulted.
    #[must_use]
    pub fn new(identity: TypeIdentity, location: SourceLocation) -> Self {
        Self {
            identity,
            location,
            unit: Property::Default,
            use_unit_bias: Property::Default,
            vector: Property::Default,
            quantity: QuantityProperties::default(),
        }
    }
}

/// Declaration of a specialized scalar.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpecializedScalarDeclaration {
    /// The declared type.
    pub identity: TypeIdentity,
    /// Where the type was declared.
    pub location: SourceLocation,
    /// The scalar being specialized. Required.
    pub original: Property<TypeIdentity>,
    /// Inheritance flags.
    pub inheritance: InheritanceProperties,
    /// Conversion operators.
    pub casts: CastProperties,
    /// The vector quantity with this scalar as magnitude.
    pub vector: Property<TypeIdentity>,
    /// Shared quantity properties.
    pub quantity: QuantityProperties,
}

impl SpecializedScalarDeclaration {
    /// Creates a declaration with every property defaulted.
    #[must_use]
    pub fn new(identity: TypeIdentity, location: SourceLocation) -> Self {
        Self {
            identity,
            location,
            original: Property::Default,
            inheritance: InheritanceProperties::default(),
            casts: CastProperties::default(),
            vector: Property::Default,
            quantity: QuantityProperties::default(),
        }
    }
}

// =============================================================================
// Vectors
// =============================================================================

/// Declaration of a base vector.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VectorDeclaration {
    /// The declared type.
    pub identity: TypeIdentity,
    /// Where the type was declared.
    pub location: SourceLocation,
    /// The unit of every component. Required.
    pub unit: Property<TypeIdentity>,
    /// Number of components. Required.
    pub dimension: Property<i64>,
    /// The scalar describing the magnitude.
    pub scalar: Property<TypeIdentity>,
    /// Shared quantity properties.
    pub quantity: QuantityProperties,
}

impl VectorDeclaration {
    /// Creates a declaration with every property defaulted.
    #[must_use]
    pub fn new(identity: TypeIdentity, location: SourceLocation) -> Self {
        Self {
            identity,
            location,
            unit: Property::Default,
            dimension: Property::Default,
            scalar: Property::Default,
            quantity: QuantityProperties::default(),
        }
    }
}

/// Declaration of a specialized vector.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpecializedVectorDeclaration {
    /// The declared type.
    pub identity: TypeIdentity,
    /// Where the type was declared.
    pub location: SourceLocation,
    /// The vector being specialized. Required.
    pub original: Property<TypeIdentity>,
    /// Inheritance flags.
    pub inheritance: InheritanceProperties,
    /// Conversion operators.
    pub casts: CastProperties,
    /// The scalar describing the magnitude.
    pub scalar: Property<TypeIdentity>,
    /// Shared quantity properties.
    pub quantity: QuantityProperties,
}

impl SpecializedVectorDeclaration {
    /// Creates a declaration with every property defaulted.
    #[must_use]
    pub fn new(identity: TypeIdentity, location: SourceLocation) -> Self {
        Self {
            identity,
            location,
            original: Property::Default,
            inheritance: InheritanceProperties::default(),
            casts: CastProperties::default(),
            scalar: Property::Default,
            quantity: QuantityProperties::default(),
        }
    }
}

// =============================================================================
// Vector Groups
// =============================================================================

/// Declaration of a base vector group.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VectorGroupDeclaration {
    /// The declared type.
    pub identity: TypeIdentity,
    /// Where the type was declared.
    pub location: SourceLocation,
    /// The unit shared by every member. Required.
    pub unit: Property<TypeIdentity>,
    /// The scalar describing the magnitude of members.
    pub scalar: Property<TypeIdentity>,
    /// Shared quantity properties.
    pub quantity: QuantityProperties,
}

impl VectorGroupDeclaration {
    /// Creates a declaration with every property defaulted.
    #[must_use]
    pub fn new(identity: TypeIdentity, location: SourceLocation) -> Self {
        Self {
            identity,
            location,
            unit: Property::Default,
            scalar: Property::Default,
            quantity: QuantityProperties::default(),
        }
    }
}

/// Declaration of a specialized vector group.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpecializedVectorGroupDeclaration {
    /// The declared type.
    pub identity: TypeIdentity,
    /// Where the type was declared.
    pub location: SourceLocation,
    /// The vector group being specialized. Required.
    pub original: Property<TypeIdentity>,
    /// Inheritance flags.
    pub inheritance: InheritanceProperties,
    /// Conversion operators.
    pub casts: CastProperties,
    /// The scalar describing the magnitude of members.
    pub scalar: Property<TypeIdentity>,
    /// Shared quantity properties.
    pub quantity: QuantityProperties,
}

impl SpecializedVectorGroupDeclaration {
    /// Creates a declaration with every property defaulted.
    #[must_use]
    pub fn new(identity: TypeIdentity, location: SourceLocation) -> Self {
        Self {
            identity,
            location,
            original: Property::Default,
            inheritance: InheritanceProperties::default(),
            casts: CastProperties::default(),
            scalar: Property::Default,
            quantity: QuantityProperties::default(),
        }
    }
}

/// Declaration of a member of a vector group.
///
/// A member is the vector of one fixed dimension within its group, such as
/// `Position3` of `Position`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VectorGroupMemberDeclaration {
    /// The declared type.
    pub identity: TypeIdentity,
    /// Where the type was declared.
    pub location: SourceLocation,
    /// The group this member belongs to. Required.
    pub group: Property<TypeIdentity>,
    /// Number of components. Defaults to the trailing number of the name.
    pub dimension: Property<i64>,
    /// What the member inherits from the group and its specializations.
    pub inheritance: InheritanceProperties,
}

impl VectorGroupMemberDeclaration {
    /// Creates a declaration with every property defaulted.
    #[must_use]
    pub fn new(identity: TypeIdentity, location: SourceLocation) -> Self {
        Self {
            identity,
            location,
            group: Property::Default,
            dimension: Property::Default,
            inheritance: InheritanceProperties::default(),
        }
    }
}

// =============================================================================
// Declaration
// =============================================================================

/// Any raw declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Declaration {
    /// A unit.
    Unit(UnitDeclaration),
    /// A base scalar.
    Scalar(ScalarDeclaration),
    /// A specialized scalar.
    SpecializedScalar(SpecializedScalarDeclaration),
    /// A base vector.
    Vector(VectorDeclaration),
    /// A specialized vector.
    SpecializedVector(SpecializedVectorDeclaration),
    /// A base vector group.
    VectorGroup(VectorGroupDeclaration),
    /// A specialized vector group.
    SpecializedVectorGroup(SpecializedVectorGroupDeclaration),
    /// A member of a vector group.
    VectorGroupMember(VectorGroupMemberDeclaration),
}

impl Declaration {
    /// Returns the registry this declaration targets.
    #[must_use]
    pub const fn kind(&self) -> QuantityKind {
        match self {
            Self::Unit(_) => QuantityKind::Unit,
            Self::Scalar(_) | Self::SpecializedScalar(_) => QuantityKind::Scalar,
            Self::Vector(_) | Self::SpecializedVector(_) => QuantityKind::Vector,
            Self::VectorGroup(_) | Self::SpecializedVectorGroup(_) => QuantityKind::VectorGroup,
            Self::VectorGroupMember(_) => QuantityKind::VectorGroupMember,
        }
    }

    /// Returns true for specializations of another quantity.
    #[must_use]
    pub const fn is_specialization(&self) -> bool {
        matches!(
            self,
            Self::SpecializedScalar(_) | Self::SpecializedVector(_) | Self::SpecializedVectorGroup(_)
        )
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn identity(&self) -> &TypeIdentity {
        match self {
            Self::Unit(d) => &d.identity,
            Self::Scalar(d) => &d.identity,
            Self::SpecializedScalar(d) => &d.identity,
            Self::Vector(d) => &d.identity,
            Self::SpecializedVector(d) => &d.identity,
            Self::VectorGroup(d) => &d.identity,
            Self::SpecializedVectorGroup(d) => &d.identity,
            Self::VectorGroupMember(d) => &d.identity,
        }
    }

    /// Returns where the type was declared.
    #[must_use]
    pub const fn location(&self) -> &SourceLocation {
        match self {
            Self::Unit(d) => &d.location,
            Self::Scalar(d) => &d.location,
            Self::SpecializedScalar(d) => &d.location,
            Self::Vector(d) => &d.location,
            Self::SpecializedVector(d) => &d.location,
            Self::VectorGroup(d) => &d.location,
            Self::SpecializedVectorGroup(d) => &d.location,
            Self::VectorGroupMember(d) => &d.location,
        }
    }
}

impl From<UnitDeclaration> for Declaration {
    fn from(d: UnitDeclaration) -> Self {
        Self::Unit(d)
    }
}

impl From<ScalarDeclaration> for Declaration {
    fn from(d: ScalarDeclaration) -> Self {
        Self::Scalar(d)
    }
}

impl From<SpecializedScalarDeclaration> for Declaration {
    fn from(d: SpecializedScalarDeclaration) -> Self {
        Self::SpecializedScalar(d)
    }
}

impl From<VectorDeclaration> for Declaration {
    fn from(d: VectorDeclaration) -> Self {
        Self::Vector(d)
    }
}

impl From<SpecializedVectorDeclaration> for Declaration {
    fn from(d: SpecializedVectorDeclaration) -> Self {
        Self::SpecializedVector(d)
    }
}

impl From<VectorGroupDeclaration> for Declaration {
    fn from(d: VectorGroupDeclaration) -> Self {
        Self::VectorGroup(d)
    }
}

impl From<SpecializedVectorGroupDeclaration> for Declaration {
    fn from(d: SpecializedVectorGroupDeclaration) -> Self {
        Self::SpecializedVectorGroup(d)
    }
}

impl From<VectorGroupMemberDeclaration> for Declaration {
    fn from(d: VectorGroupMemberDeclaration) -> Self {
        Self::VectorGroupMember(d)
    }
}
