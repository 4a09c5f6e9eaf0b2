//! Processed definitions.
//!
//! A definition is a declaration that passed every local check: required
//! properties are present, enums are in range, defaults are applied, and
//! cross references are typed [`Reference`]s. Whether those references point
//! at anything is decided later, against the whole population.

use std::fmt;

use metrology_foundation::{QuantityKind, SourceLocation, TypeIdentity};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// References and Options
// =============================================================================

/// A reference to another declared type, with where it was written.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reference {
    /// The referenced type.
    pub identity: TypeIdentity,
    /// Where the reference was written.
    pub location: SourceLocation,
}

impl Reference {
    /// Creates a reference.
    #[must_use]
    pub fn new(identity: TypeIdentity, location: SourceLocation) -> Self {
        Self { identity, location }
    }
}

/// How a conversion operator is generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConversionOperatorBehaviour {
    /// No operator.
    None,
    /// An explicit cast.
    Explicit,
    /// An implicit conversion.
    Implicit,
}

impl ConversionOperatorBehaviour {
    /// Decodes a raw declaration value.
    #[must_use]
    pub const fn from_raw(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Explicit),
            2 => Some(Self::Implicit),
            _ => None,
        }
    }
}

impl fmt::Display for ConversionOperatorBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Explicit => f.write_str("explicit"),
            Self::Implicit => f.write_str("implicit"),
        }
    }
}

/// Resolved inheritance flags of a specialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct Inheritance {
    /// Inherit derived-quantity operators.
    pub derivations: bool,
    /// Inherit named constants.
    pub constants: bool,
    /// Inherit conversion operators.
    pub conversions: bool,
    /// Inherit the set of included units.
    pub units: bool,
}

impl Default for Inheritance {
    fn default() -> Self {
        Self {
            derivations: true,
            constants: true,
            conversions: true,
            units: true,
        }
    }
}

/// Resolved conversion operators of a specialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Casts {
    /// Original to specialization.
    pub forwards: ConversionOperatorBehaviour,
    /// Specialization to original.
    pub backwards: ConversionOperatorBehaviour,
}

impl Default for Casts {
    fn default() -> Self {
        Self {
            forwards: ConversionOperatorBehaviour::Implicit,
            backwards: ConversionOperatorBehaviour::Explicit,
        }
    }
}

/// The unit instance used when a value is printed or constructed without one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DefaultUnit {
    /// Name of the unit instance.
    pub name: String,
    /// Its symbol; dropped if it disagrees with the instance.
    pub symbol: Option<String>,
    /// Where the default unit was written.
    pub location: SourceLocation,
}

/// Options shared by scalars, vectors, and vector groups.
///
/// `None` flags mean "not written": bases treat them as true, and
/// specializations inherit them from the original.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuantityOptions {
    /// Whether `a + b` is generated.
    pub implement_sum: Option<bool>,
    /// Whether `a - b` is generated.
    pub implement_difference: Option<bool>,
    /// The quantity produced by `a - b`.
    pub difference: Option<Reference>,
    /// The default unit instance.
    pub default_unit: Option<DefaultUnit>,
}

impl QuantityOptions {
    /// Returns whether sums are generated, treating unset as true.
    #[must_use]
    pub fn implements_sum(&self) -> bool {
        self.implement_sum.unwrap_or(true)
    }

    /// Returns whether differences are generated, treating unset as true.
    #[must_use]
    pub fn implements_difference(&self) -> bool {
        self.implement_difference.unwrap_or(true)
    }
}

// =============================================================================
// Origins
// =============================================================================

/// How a specialization relates to the quantity it specializes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Specialization {
    /// The quantity being specialized.
    pub original: Reference,
    /// What is inherited from it.
    pub inheritance: Inheritance,
    /// Conversion operators to and from it.
    pub casts: Casts,
}

/// Either a base quantity with its own properties, or a specialization.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Origin<B> {
    /// A root of its specialization chain.
    Base(B),
    /// Specializes another quantity of the same kind.
    Specialized(Specialization),
}

impl<B> Origin<B> {
    /// Returns the base properties, if this is a base.
    #[must_use]
    pub const fn base(&self) -> Option<&B> {
        match self {
            Self::Base(base) => Some(base),
            Self::Specialized(_) => None,
        }
    }

    /// Returns the specialized quantity, if this is a specialization.
    #[must_use]
    pub const fn original(&self) -> Option<&Reference> {
        match self {
            Self::Base(_) => None,
            Self::Specialized(specialization) => Some(&specialization.original),
        }
    }
}

/// Properties only a base quantity carries.
pub trait QuantityBase {
    /// The unit of the quantity.
    fn unit(&self) -> &Reference;
}

/// Base scalar properties.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScalarBase {
    /// The unit of the scalar.
    pub unit: Reference,
    /// Whether the scalar includes the unit bias.
    pub use_unit_bias: bool,
}

/// Base vector properties.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VectorBase {
    /// The unit of every component.
    pub unit: Reference,
    /// Number of components.
    pub dimension: u32,
}

/// Base vector group properties.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupBase {
    /// The unit shared by every member.
    pub unit: Reference,
}

impl QuantityBase for ScalarBase {
    fn unit(&self) -> &Reference {
        &self.unit
    }
}

impl QuantityBase for VectorBase {
    fn unit(&self) -> &Reference {
        &self.unit
    }
}

impl QuantityBase for GroupBase {
    fn unit(&self) -> &Reference {
        &self.unit
    }
}

// =============================================================================
// Definitions
// =============================================================================

/// A named instance of a unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitInstance {
    /// Singular name.
    pub name: String,
    /// Plural name.
    pub plural: String,
    /// Printed symbol.
    pub symbol: Option<String>,
    /// Where the instance was declared.
    pub location: SourceLocation,
}

/// A processed unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitDefinition {
    /// The declared type.
    pub identity: TypeIdentity,
    /// Where the type was declared.
    pub location: SourceLocation,
    /// The scalar this unit measures.
    pub quantity: Reference,
    /// Whether values carry a bias.
    pub bias_term: bool,
    /// Named instances, in declaration order.
    pub instances: Vec<UnitInstance>,
}

impl UnitDefinition {
    /// Looks up an instance by name.
    #[must_use]
    pub fn instance(&self, name: &str) -> Option<&UnitInstance> {
        self.instances.iter().find(|instance| instance.name == name)
    }
}

/// A processed scalar, base or specialized.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScalarDefinition {
    /// The declared type.
    pub identity: TypeIdentity,
    /// Where the type was declared.
    pub location: SourceLocation,
    /// Base properties or the specialized scalar.
    pub origin: Origin<ScalarBase>,
    /// The vector quantity with this scalar as magnitude.
    pub vector: Option<Reference>,
    /// Shared quantity options.
    pub quantity: QuantityOptions,
}

/// A processed vector, base or specialized.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VectorDefinition {
    /// The declared type.
    pub identity: TypeIdentity,
    /// Where the type was declared.
    pub location: SourceLocation,
    /// Base properties or the specialized vector.
    pub origin: Origin<VectorBase>,
    /// The scalar describing the magnitude.
    pub scalar: Option<Reference>,
    /// Shared quantity options.
    pub quantity: QuantityOptions,
}

/// A processed vector group, base or specialized.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupDefinition {
    /// The declared type.
    pub identity: TypeIdentity,
    /// Where the type was declared.
    pub location: SourceLocation,
    /// Base properties or the specialized group.
    pub origin: Origin<GroupBase>,
    /// The scalar describing the magnitude of members.
    pub scalar: Option<Reference>,
    /// Shared quantity options.
    pub quantity: QuantityOptions,
}

/// A processed member of a vector group.
///
/// Members are not specialized: the unit, scalar, and default unit all come
/// from the group.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemberDefinition {
    /// The declared type.
    pub identity: TypeIdentity,
    /// Where the type was declared.
    pub location: SourceLocation,
    /// The group this member belongs to.
    pub group: Reference,
    /// Number of components.
    pub dimension: u32,
    /// What is inherited from the group.
    pub inheritance: Inheritance,
}

/// Common access to scalar, vector, and vector group definitions.
pub trait QuantityDefinition: Clone + fmt::Debug + Send + Sync {
    /// Base-only properties of this kind.
    type Base: QuantityBase + Clone + fmt::Debug + Send + Sync;

    /// The registry this kind belongs to.
    const KIND: QuantityKind;

    /// The declared type.
    fn identity(&self) -> &TypeIdentity;

    /// Where the type was declared.
    fn location(&self) -> &SourceLocation;

    /// Base properties or the specialized quantity.
    fn origin(&self) -> &Origin<Self::Base>;

    /// Shared quantity options.
    fn quantity(&self) -> &QuantityOptions;

    /// Mutable shared quantity options.
    fn quantity_mut(&mut self) -> &mut QuantityOptions;
}

impl QuantityDefinition for ScalarDefinition {
    type Base = ScalarBase;
    const KIND: QuantityKind = QuantityKind::Scalar;

    fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    fn location(&self) -> &SourceLocation {
        &self.location
    }

    fn origin(&self) -> &Origin<ScalarBase> {
        &self.origin
    }

    fn quantity(&self) -> &QuantityOptions {
        &self.quantity
    }

    fn quantity_mut(&mut self) -> &mut QuantityOptions {
        &mut self.quantity
    }
}

impl QuantityDefinition for VectorDefinition {
    type Base = VectorBase;
    const KIND: QuantityKind = QuantityKind::Vector;

    fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    fn location(&self) -> &SourceLocation {
        &self.location
    }

    fn origin(&self) -> &Origin<VectorBase> {
        &self.origin
    }

    fn quantity(&self) -> &QuantityOptions {
        &self.quantity
    }

    fn quantity_mut(&mut self) -> &mut QuantityOptions {
        &mut self.quantity
    }
}

impl QuantityDefinition for GroupDefinition {
    type Base = GroupBase;
    const KIND: QuantityKind = QuantityKind::VectorGroup;

    fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    fn location(&self) -> &SourceLocation {
        &self.location
    }

    fn origin(&self) -> &Origin<GroupBase> {
        &self.origin
    }

    fn quantity(&self) -> &QuantityOptions {
        &self.quantity
    }

    fn quantity_mut(&mut self) -> &mut QuantityOptions {
        &mut self.quantity
    }
}

/// Any processed definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Definition {
    /// A unit.
    Unit(UnitDefinition),
    /// A scalar.
    Scalar(ScalarDefinition),
    /// A vector.
    Vector(VectorDefinition),
    /// A vector group.
    Group(GroupDefinition),
    /// A member of a vector group.
    Member(MemberDefinition),
}

impl Definition {
    /// Returns the registry this definition targets.
    #[must_use]
    pub const fn kind(&self) -> QuantityKind {
        match self {
            Self::Unit(_) => QuantityKind::Unit,
            Self::Scalar(_) => QuantityKind::Scalar,
            Self::Vector(_) => QuantityKind::Vector,
            Self::Group(_) => QuantityKind::VectorGroup,
            Self::Member(_) => QuantityKind::VectorGroupMember,
        }
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn identity(&self) -> &TypeIdentity {
        match self {
            Self::Unit(d) => &d.identity,
            Self::Scalar(d) => &d.identity,
            Self::Vector(d) => &d.identity,
            Self::Group(d) => &d.identity,
            Self::Member(d) => &d.identity,
        }
    }

    /// Returns where the type was declared.
    #[must_use]
    pub const fn location(&self) -> &SourceLocation {
        match self {
            Self::Unit(d) => &d.location,
            Self::Scalar(d) => &d.location,
            Self::Vector(d) => &d.location,
            Self::Group(d) => &d.location,
            Self::Member(d) => &d.location,
        }
    }

    /// Returns the specialized quantity, for specializations.
    #[must_use]
    pub const fn original(&self) -> Option<&Reference> {
        match self {
            Self::Unit(_) | Self::Member(_) => None,
            Self::Scalar(d) => d.origin.original(),
            Self::Vector(d) => d.origin.original(),
            Self::Group(d) => d.origin.original(),
        }
    }
}

impl From<UnitDefinition> for Definition {
    fn from(definition: UnitDefinition) -> Self {
        Self::Unit(definition)
    }
}

impl From<ScalarDefinition> for Definition {
    fn from(definition: ScalarDefinition) -> Self {
        Self::Scalar(definition)
    }
}

impl From<VectorDefinition> for Definition {
    fn from(definition: VectorDefinition) -> Self {
        Self::Vector(definition)
    }
}

impl From<GroupDefinition> for Definition {
    fn from(definition: GroupDefinition) -> Self {
        Self::Group(definition)
    }
}

impl From<MemberDefinition> for Definition {
    fn from(definition: MemberDefinition) -> Self {
        Self::Member(definition)
    }
}
