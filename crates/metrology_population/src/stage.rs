//! Registry entries and population stages.
//!
//! A [`Population`](crate::Population) is built twice per pass: once from
//! processed definitions, as the snapshot validation reads, and once from
//! validated definitions, as the published result. The [`Stage`] parameter
//! fixes which entry type each registry holds.

use std::fmt;

use metrology_declaration::{
    Definition, GroupDefinition, MemberDefinition, QuantityOptions, Reference, ScalarDefinition,
    UnitDefinition, VectorDefinition,
};
use metrology_foundation::{QuantityKind, SourceLocation, TypeIdentity};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Something a registry can hold.
pub trait Entry: Clone + fmt::Debug + Send + Sync {
    /// The registry this entry belongs to.
    const KIND: QuantityKind;

    /// The declared type.
    fn identity(&self) -> &TypeIdentity;

    /// Where the type was declared.
    fn location(&self) -> &SourceLocation;

    /// The quantity this entry specializes, if any.
    fn original(&self) -> Option<&TypeIdentity>;
}

impl Entry for UnitDefinition {
    const KIND: QuantityKind = QuantityKind::Unit;

    fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    fn location(&self) -> &SourceLocation {
        &self.location
    }

    fn original(&self) -> Option<&TypeIdentity> {
        None
    }
}

impl Entry for ScalarDefinition {
    const KIND: QuantityKind = QuantityKind::Scalar;

    fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    fn location(&self) -> &SourceLocation {
        &self.location
    }

    fn original(&self) -> Option<&TypeIdentity> {
        self.origin.original().map(|reference| &reference.identity)
    }
}

impl Entry for VectorDefinition {
    const KIND: QuantityKind = QuantityKind::Vector;

    fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    fn location(&self) -> &SourceLocation {
        &self.location
    }

    fn original(&self) -> Option<&TypeIdentity> {
        self.origin.original().map(|reference| &reference.identity)
    }
}

impl Entry for GroupDefinition {
    const KIND: QuantityKind = QuantityKind::VectorGroup;

    fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    fn location(&self) -> &SourceLocation {
        &self.location
    }

    fn original(&self) -> Option<&TypeIdentity> {
        self.origin.original().map(|reference| &reference.identity)
    }
}

impl Entry for MemberDefinition {
    const KIND: QuantityKind = QuantityKind::VectorGroupMember;

    fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    fn location(&self) -> &SourceLocation {
        &self.location
    }

    fn original(&self) -> Option<&TypeIdentity> {
        None
    }
}

/// An entry of the vector group member registry.
pub trait GroupMember: Entry {
    /// The vector group this member belongs to.
    fn group(&self) -> &TypeIdentity;

    /// The member's dimension within its group.
    fn dimension(&self) -> u32;
}

impl GroupMember for MemberDefinition {
    fn group(&self) -> &TypeIdentity {
        &self.group.identity
    }

    fn dimension(&self) -> u32 {
        self.dimension
    }
}

impl GroupMember for Validated<MemberDefinition> {
    fn group(&self) -> &TypeIdentity {
        self.definition.group()
    }

    fn dimension(&self) -> u32 {
        self.definition.dimension
    }
}

/// A definition whose references were checked against the population.
///
/// Optional references that did not resolve have been dropped.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Validated<D> {
    /// The definition, with unresolved optional references removed.
    pub definition: D,
    /// Terminal base of the specialization chain; the type itself for bases and units.
    pub root: TypeIdentity,
    /// The unit inherited from the root; the type itself for units.
    pub unit: TypeIdentity,
}

impl<D> Validated<D> {
    /// Returns the validated definition.
    #[must_use]
    pub const fn definition(&self) -> &D {
        &self.definition
    }

    /// Returns the root of the specialization chain.
    #[must_use]
    pub const fn root(&self) -> &TypeIdentity {
        &self.root
    }

    /// Returns the unit inherited from the root.
    #[must_use]
    pub const fn unit(&self) -> &TypeIdentity {
        &self.unit
    }
}

impl<D: Entry> Entry for Validated<D> {
    const KIND: QuantityKind = D::KIND;

    fn identity(&self) -> &TypeIdentity {
        self.definition.identity()
    }

    fn location(&self) -> &SourceLocation {
        self.definition.location()
    }

    fn original(&self) -> Option<&TypeIdentity> {
        self.definition.original()
    }
}

/// Any validated definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValidatedDefinition {
    /// A unit.
    Unit(Validated<UnitDefinition>),
    /// A scalar.
    Scalar(Validated<ScalarDefinition>),
    /// A vector.
    Vector(Validated<VectorDefinition>),
    /// A vector group.
    Group(Validated<GroupDefinition>),
    /// A member of a vector group.
    Member(Validated<MemberDefinition>),
}

impl ValidatedDefinition {
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
    pub fn identity(&self) -> &TypeIdentity {
        match self {
            Self::Unit(v) => v.identity(),
            Self::Scalar(v) => v.identity(),
            Self::Vector(v) => v.identity(),
            Self::Group(v) => v.identity(),
            Self::Member(v) => v.identity(),
        }
    }

    /// Returns where the type was declared.
    #[must_use]
    pub fn location(&self) -> &SourceLocation {
        match self {
            Self::Unit(v) => v.location(),
            Self::Scalar(v) => v.location(),
            Self::Vector(v) => v.location(),
            Self::Group(v) => v.location(),
            Self::Member(v) => v.location(),
        }
    }

    /// Returns the root of the specialization chain.
    #[must_use]
    pub const fn root(&self) -> &TypeIdentity {
        match self {
            Self::Unit(v) => &v.root,
            Self::Scalar(v) => &v.root,
            Self::Vector(v) => &v.root,
            Self::Group(v) => &v.root,
            Self::Member(v) => &v.root,
        }
    }

    /// Returns the processed definition this was validated from.
    #[must_use]
    pub fn to_definition(&self) -> Definition {
        match self {
            Self::Unit(v) => Definition::Unit(v.definition.clone()),
            Self::Scalar(v) => Definition::Scalar(v.definition.clone()),
            Self::Vector(v) => Definition::Vector(v.definition.clone()),
            Self::Group(v) => Definition::Group(v.definition.clone()),
            Self::Member(v) => Definition::Member(v.definition.clone()),
        }
    }

    /// Returns the types this definition cannot be published without.
    ///
    /// These are the quantity of a unit, the original of a specialization,
    /// the group of a member, and the root and unit every definition
    /// inherits. The definition itself is never listed.
    #[must_use]
    pub fn requirements(&self) -> Vec<&TypeIdentity> {
        let mut required = match self {
            Self::Unit(v) => vec![&v.definition.quantity.identity],
            Self::Scalar(v) => original(v.definition.origin.original()),
            Self::Vector(v) => original(v.definition.origin.original()),
            Self::Group(v) => original(v.definition.origin.original()),
            Self::Member(v) => vec![&v.definition.group.identity],
        };
        let (root, unit) = match self {
            Self::Unit(v) => (&v.root, &v.unit),
            Self::Scalar(v) => (&v.root, &v.unit),
            Self::Vector(v) => (&v.root, &v.unit),
            Self::Group(v) => (&v.root, &v.unit),
            Self::Member(v) => (&v.root, &v.unit),
        };
        required.extend([root, unit]);
        required.retain(|identity| *identity != self.identity());
        required.sort();
        required.dedup();
        required
    }

    /// Drops optional references whose target `keep` rejects.
    pub fn retain_references(&mut self, keep: impl Fn(&TypeIdentity) -> bool) {
        let retain = |reference: &mut Option<Reference>| {
            if reference.as_ref().is_some_and(|r| !keep(&r.identity)) {
                *reference = None;
            }
        };
        let options = |quantity: &mut QuantityOptions| retain(&mut quantity.difference);
        match self {
            Self::Unit(_) | Self::Member(_) => {}
            Self::Scalar(v) => {
                retain(&mut v.definition.vector);
                options(&mut v.definition.quantity);
            }
            Self::Vector(v) => {
                retain(&mut v.definition.scalar);
                options(&mut v.definition.quantity);
            }
            Self::Group(v) => {
                retain(&mut v.definition.scalar);
                options(&mut v.definition.quantity);
            }
        }
    }
}

fn original(reference: Option<&Reference>) -> Vec<&TypeIdentity> {
    reference.map(|r| &r.identity).into_iter().collect()
}

/// Which entry type each registry of a population holds.
pub trait Stage: Clone + Copy + fmt::Debug + Send + Sync + 'static {
    /// Unit registry entries.
    type Unit: Entry;
    /// Scalar registry entries.
    type Scalar: Entry;
    /// Vector registry entries.
    type Vector: Entry;
    /// Vector group registry entries.
    type Group: Entry;
    /// Vector group member registry entries.
    type Member: GroupMember;
}

/// Registries of processed, not yet validated, definitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Processed;

impl Stage for Processed {
    type Unit = UnitDefinition;
    type Scalar = ScalarDefinition;
    type Vector = VectorDefinition;
    type Group = GroupDefinition;
    type Member = MemberDefinition;
}

/// Registries of validated definitions; the published result of a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolved;

impl Stage for Resolved {
    type Unit = Validated<UnitDefinition>;
    type Scalar = Validated<ScalarDefinition>;
    type Vector = Validated<VectorDefinition>;
    type Group = Validated<GroupDefinition>;
    type Member = Validated<MemberDefinition>;
}
