//! The five-registry population and its assembly.
//!
//! A [`Population`] is an immutable snapshot: five disjoint registries keyed
//! by [`TypeIdentity`], plus the resolved root of every well-formed
//! specialization chain and the members of every vector group. Assembly is the only serial step of a pass. It sorts
//! its inputs canonically first, so the result does not depend on the order
//! declarations were processed in.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use metrology_declaration::Definition;
use metrology_foundation::{PersistentMap, QuantityKind, TypeIdentity};
use tracing::debug;

use crate::stage::{Entry, GroupMember, Processed, Resolved, Stage, ValidatedDefinition};
use crate::tally::DeclarationTally;

/// Why a specialization chain has no root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChainFault {
    /// The chain revisits one of its own members.
    Cycle,
    /// The chain reaches an identity missing from the registry.
    Dangling(TypeIdentity),
}

impl fmt::Display for ChainFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cycle => f.write_str("the specialization chain is cyclic"),
            Self::Dangling(missing) => {
                write!(f, "the specialization chain reaches unknown type '{missing}'")
            }
        }
    }
}

/// One registry and the roots of its chains.
#[derive(Clone, Debug)]
struct Registry<E: Entry> {
    entries: PersistentMap<TypeIdentity, E>,
    roots: PersistentMap<TypeIdentity, TypeIdentity>,
}

impl<E: Entry> Default for Registry<E> {
    fn default() -> Self {
        Self {
            entries: PersistentMap::new(),
            roots: PersistentMap::new(),
        }
    }
}

/// The published registries of one pass.
///
/// Invariant: an identity is in at most one registry, and identities
/// declared more than once are in none.
#[derive(Clone, Debug)]
pub struct Population<S: Stage> {
    units: Registry<S::Unit>,
    scalars: Registry<S::Scalar>,
    vectors: Registry<S::Vector>,
    groups: Registry<S::Group>,
    members: Registry<S::Member>,
    members_by_group: PersistentMap<TypeIdentity, PersistentMap<u32, TypeIdentity>>,
    unresolved: PersistentMap<TypeIdentity, ChainFault>,
    tally: DeclarationTally,
}

impl<S: Stage> Default for Population<S> {
    fn default() -> Self {
        Self {
            units: Registry::default(),
            scalars: Registry::default(),
            vectors: Registry::default(),
            groups: Registry::default(),
            members: Registry::default(),
            members_by_group: PersistentMap::new(),
            unresolved: PersistentMap::new(),
            tally: DeclarationTally::new(),
        }
    }
}

impl<S: Stage> Population<S> {
    /// Creates an empty population.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Registries
    // =========================================================================

    /// Returns the unit registry.
    #[must_use]
    pub fn units(&self) -> &PersistentMap<TypeIdentity, S::Unit> {
        &self.units.entries
    }

    /// Returns the scalar registry.
    #[must_use]
    pub fn scalars(&self) -> &PersistentMap<TypeIdentity, S::Scalar> {
        &self.scalars.entries
    }

    /// Returns the vector registry.
    #[must_use]
    pub fn vectors(&self) -> &PersistentMap<TypeIdentity, S::Vector> {
        &self.vectors.entries
    }

    /// Returns the vector group registry.
    #[must_use]
    pub fn groups(&self) -> &PersistentMap<TypeIdentity, S::Group> {
        &self.groups.entries
    }

    /// Returns the vector group member registry.
    #[must_use]
    pub fn members(&self) -> &PersistentMap<TypeIdentity, S::Member> {
        &self.members.entries
    }

    /// Looks up a unit.
    #[must_use]
    pub fn unit(&self, identity: &TypeIdentity) -> Option<&S::Unit> {
        self.units.entries.get(identity)
    }

    /// Looks up a scalar.
    #[must_use]
    pub fn scalar(&self, identity: &TypeIdentity) -> Option<&S::Scalar> {
        self.scalars.entries.get(identity)
    }

    /// Looks up a vector.
    #[must_use]
    pub fn vector(&self, identity: &TypeIdentity) -> Option<&S::Vector> {
        self.vectors.entries.get(identity)
    }

    /// Looks up a vector group.
    #[must_use]
    pub fn group(&self, identity: &TypeIdentity) -> Option<&S::Group> {
        self.groups.entries.get(identity)
    }

    /// Looks up a vector group member.
    #[must_use]
    pub fn member(&self, identity: &TypeIdentity) -> Option<&S::Member> {
        self.members.entries.get(identity)
    }

    /// Returns the registry holding `identity`, if any.
    #[must_use]
    pub fn kind_of(&self, identity: &TypeIdentity) -> Option<QuantityKind> {
        QuantityKind::ALL
            .into_iter()
            .find(|kind| self.contains(*kind, identity))
    }

    /// Returns true if the registry of `kind` holds `identity`.
    #[must_use]
    pub fn contains(&self, kind: QuantityKind, identity: &TypeIdentity) -> bool {
        match kind {
            QuantityKind::Unit => self.units.entries.contains_key(identity),
            QuantityKind::Scalar => self.scalars.entries.contains_key(identity),
            QuantityKind::Vector => self.vectors.entries.contains_key(identity),
            QuantityKind::VectorGroup => self.groups.entries.contains_key(identity),
            QuantityKind::VectorGroupMember => self.members.entries.contains_key(identity),
        }
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.entries.len()
            + self.scalars.entries.len()
            + self.vectors.entries.len()
            + self.groups.entries.len()
            + self.members.entries.len()
    }

    /// Returns true if no type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Specialization Chains
    // =========================================================================

    /// Maps every scalar with a well-formed chain to its root.
    #[must_use]
    pub fn scalar_bases(&self) -> &PersistentMap<TypeIdentity, TypeIdentity> {
        &self.scalars.roots
    }

    /// Maps every vector with a well-formed chain to its root.
    #[must_use]
    pub fn vector_bases(&self) -> &PersistentMap<TypeIdentity, TypeIdentity> {
        &self.vectors.roots
    }

    /// Maps every vector group with a well-formed chain to its root.
    #[must_use]
    pub fn group_bases(&self) -> &PersistentMap<TypeIdentity, TypeIdentity> {
        &self.groups.roots
    }

    /// Returns the root identity of a chain of `kind`.
    ///
    /// Units and members have no chains; a registered one is its own root.
    #[must_use]
    pub fn root_of(&self, kind: QuantityKind, identity: &TypeIdentity) -> Option<&TypeIdentity> {
        match kind {
            QuantityKind::Unit => self.units.entries.get(identity).map(Entry::identity),
            QuantityKind::Scalar => self.scalars.roots.get(identity),
            QuantityKind::Vector => self.vectors.roots.get(identity),
            QuantityKind::VectorGroup => self.groups.roots.get(identity),
            QuantityKind::VectorGroupMember => {
                self.members.entries.get(identity).map(Entry::identity)
            }
        }
    }

    /// Returns the root scalar of a scalar's chain.
    #[must_use]
    pub fn scalar_base(&self, identity: &TypeIdentity) -> Option<&S::Scalar> {
        self.scalars
            .roots
            .get(identity)
            .and_then(|root| self.scalars.entries.get(root))
    }

    /// Returns the root vector of a vector's chain.
    #[must_use]
    pub fn vector_base(&self, identity: &TypeIdentity) -> Option<&S::Vector> {
        self.vectors
            .roots
            .get(identity)
            .and_then(|root| self.vectors.entries.get(root))
    }

    /// Returns the root vector group of a vector group's chain.
    #[must_use]
    pub fn group_base(&self, identity: &TypeIdentity) -> Option<&S::Group> {
        self.groups
            .roots
            .get(identity)
            .and_then(|root| self.groups.entries.get(root))
    }

    // =========================================================================
    // Vector Group Members
    // =========================================================================

    /// Returns the members of a registered vector group, by dimension.
    ///
    /// Only the first member of each dimension, in declaration order, is
    /// listed.
    #[must_use]
    pub fn members_of(&self, group: &TypeIdentity) -> Option<&PersistentMap<u32, TypeIdentity>> {
        self.members_by_group.get(group)
    }

    /// Returns the member of `group` with the given dimension.
    #[must_use]
    pub fn member_of_dimension(&self, group: &TypeIdentity, dimension: u32) -> Option<&S::Member> {
        self.members_of(group)
            .and_then(|members| members.get(&dimension))
            .and_then(|member| self.members.entries.get(member))
    }

    /// Returns why a registered type's chain has no root.
    #[must_use]
    pub fn chain_fault(&self, identity: &TypeIdentity) -> Option<&ChainFault> {
        self.unresolved.get(identity)
    }

    /// Returns every registered type whose chain has no root.
    #[must_use]
    pub fn unresolved(&self) -> &PersistentMap<TypeIdentity, ChainFault> {
        &self.unresolved
    }

    /// Returns the declaration tally the registries were filtered by.
    #[must_use]
    pub fn tally(&self) -> &DeclarationTally {
        &self.tally
    }

    /// Returns vector groups declared more than once.
    pub fn duplicately_defined_groups(&self) -> impl Iterator<Item = &TypeIdentity> {
        self.tally.duplicately_defined(QuantityKind::VectorGroup)
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Entries of every kind, split by registry, before assembly.
#[derive(Clone, Debug)]
pub struct Partition<S: Stage> {
    /// Unit entries.
    pub units: Vec<S::Unit>,
    /// Scalar entries.
    pub scalars: Vec<S::Scalar>,
    /// Vector entries.
    pub vectors: Vec<S::Vector>,
    /// Vector group entries.
    pub groups: Vec<S::Group>,
    /// Vector group member entries.
    pub members: Vec<S::Member>,
}

impl<S: Stage> Default for Partition<S> {
    fn default() -> Self {
        Self {
            units: Vec::new(),
            scalars: Vec::new(),
            vectors: Vec::new(),
            groups: Vec::new(),
            members: Vec::new(),
        }
    }
}

impl FromIterator<Definition> for Partition<Processed> {
    fn from_iter<I: IntoIterator<Item = Definition>>(iter: I) -> Self {
        let mut partition = Self::default();
        for definition in iter {
            match definition {
                Definition::Unit(d) => partition.units.push(d),
                Definition::Scalar(d) => partition.scalars.push(d),
                Definition::Vector(d) => partition.vectors.push(d),
                Definition::Group(d) => partition.groups.push(d),
                Definition::Member(d) => partition.members.push(d),
            }
        }
        partition
    }
}

impl FromIterator<ValidatedDefinition> for Partition<Resolved> {
    fn from_iter<I: IntoIterator<Item = ValidatedDefinition>>(iter: I) -> Self {
        let mut partition = Self::default();
        for definition in iter {
            match definition {
                ValidatedDefinition::Unit(v) => partition.units.push(v),
                ValidatedDefinition::Scalar(v) => partition.scalars.push(v),
                ValidatedDefinition::Vector(v) => partition.vectors.push(v),
                ValidatedDefinition::Group(v) => partition.groups.push(v),
                ValidatedDefinition::Member(v) => partition.members.push(v),
            }
        }
        partition
    }
}

/// Builds a population from entries of every kind.
///
/// Entries are sorted by identity and location, identities declared more
/// than once are left out, and every chain is walked once.
#[must_use]
pub fn assemble<S: Stage>(partition: Partition<S>, tally: &DeclarationTally) -> Population<S> {
    let Partition {
        units,
        scalars,
        vectors,
        groups,
        members,
    } = partition;
    let mut unresolved = BTreeMap::new();

    let units = Registry {
        entries: registry(units, tally),
        roots: PersistentMap::new(),
    };
    let scalars = chained(registry(scalars, tally), &mut unresolved);
    let vectors = chained(registry(vectors, tally), &mut unresolved);
    let groups = chained(registry(groups, tally), &mut unresolved);
    let members = Registry {
        entries: registry(members, tally),
        roots: PersistentMap::new(),
    };
    let members_by_group = index_members(&members.entries, &groups.entries);

    debug!(
        units = units.entries.len(),
        scalars = scalars.entries.len(),
        vectors = vectors.entries.len(),
        groups = groups.entries.len(),
        members = members.entries.len(),
        unresolved = unresolved.len(),
        "assembled population"
    );

    Population {
        units,
        scalars,
        vectors,
        groups,
        members,
        members_by_group,
        unresolved: unresolved.into_iter().collect(),
        tally: tally.clone(),
    }
}

/// Indexes members of registered groups by dimension.
///
/// When two members claim one dimension of a group, the one declared first
/// keeps it.
fn index_members<M: GroupMember, G: Entry>(
    members: &PersistentMap<TypeIdentity, M>,
    groups: &PersistentMap<TypeIdentity, G>,
) -> PersistentMap<TypeIdentity, PersistentMap<u32, TypeIdentity>> {
    let mut ordered: Vec<&M> = members
        .values()
        .filter(|member| groups.contains_key(member.group()))
        .collect();
    ordered.sort_by(|a, b| {
        a.location()
            .cmp(b.location())
            .then_with(|| a.identity().cmp(b.identity()))
    });

    let mut index: PersistentMap<TypeIdentity, PersistentMap<u32, TypeIdentity>> =
        PersistentMap::new();
    for member in ordered {
        let dimensions = index.get(member.group()).cloned().unwrap_or_default();
        if dimensions.contains_key(&member.dimension()) {
            continue;
        }
        let dimensions = dimensions.insert(member.dimension(), member.identity().clone());
        index = index.insert(member.group().clone(), dimensions);
    }
    index
}

fn registry<E: Entry>(
    mut entries: Vec<E>,
    tally: &DeclarationTally,
) -> PersistentMap<TypeIdentity, E> {
    entries.sort_by(|a, b| {
        a.identity()
            .cmp(b.identity())
            .then_with(|| a.location().cmp(b.location()))
    });

    let mut unique = Vec::with_capacity(entries.len());
    let mut entries = entries.into_iter().peekable();
    while let Some(entry) = entries.next() {
        let mut repeated = false;
        while entries
            .peek()
            .is_some_and(|next| next.identity() == entry.identity())
        {
            entries.next();
            repeated = true;
        }
        if !repeated && tally.is_unique(entry.identity()) {
            unique.push((entry.identity().clone(), entry));
        }
    }

    unique.into_iter().collect()
}

fn chained<E: Entry>(
    entries: PersistentMap<TypeIdentity, E>,
    unresolved: &mut BTreeMap<TypeIdentity, ChainFault>,
) -> Registry<E> {
    let mut resolved = BTreeMap::new();
    for (identity, outcome) in walk_chains(&entries) {
        match outcome {
            Ok(root) => {
                resolved.insert(identity, root);
            }
            Err(fault) => {
                unresolved.insert(identity, fault);
            }
        }
    }

    Registry {
        entries,
        roots: resolved.into_iter().collect(),
    }
}

/// Follows `original` pointers from every entry to a base.
///
/// Each identity is visited once: a walk stops at the first identity already
/// decided and every member of the walked path shares its outcome.
fn walk_chains<E: Entry>(
    entries: &PersistentMap<TypeIdentity, E>,
) -> BTreeMap<TypeIdentity, Result<TypeIdentity, ChainFault>> {
    let mut decided: BTreeMap<TypeIdentity, Result<TypeIdentity, ChainFault>> = BTreeMap::new();

    for start in entries.keys() {
        if decided.contains_key(start) {
            continue;
        }

        let mut path = Vec::new();
        let mut on_path = BTreeSet::new();
        let mut current = start.clone();

        let outcome = loop {
            if let Some(known) = decided.get(&current) {
                break known.clone();
            }
            let Some(entry) = entries.get(&current) else {
                break Err(ChainFault::Dangling(current));
            };
            if !on_path.insert(current.clone()) {
                break Err(ChainFault::Cycle);
            }
            path.push(current.clone());
            match entry.original() {
                Some(next) => current = next.clone(),
                None => break Ok(current),
            }
        };

        for member in path {
            decided.insert(member, outcome.clone());
        }
    }

    decided
}
