//! Counting declarations per identity and kind.
//!
//! The tally is taken once, over every processed definition, before any
//! validation. Registries consult it so that an identity declared more than
//! once never enters any registry, even after some of its declarations are
//! rejected.
//!
//! Every tallied declaration keeps its ordinal, its position in the sequence
//! the tally was taken from. Two declarations at one location stay distinct.

use metrology_declaration::Definition;
use metrology_foundation::{PersistentMap, QuantityKind, SourceLocation, TypeIdentity};

/// One tallied declaration.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tallied {
    /// Where it was declared.
    pub location: SourceLocation,
    /// Its position in the tallied sequence.
    pub ordinal: usize,
}

/// Where one identity was declared, per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TallyEntry {
    declarations: [Vec<Tallied>; QuantityKind::ALL.len()],
}

impl TallyEntry {
    /// Returns the declarations of this kind, by location, then ordinal.
    #[must_use]
    pub fn declarations(&self, kind: QuantityKind) -> &[Tallied] {
        &self.declarations[kind.index()]
    }

    /// Returns the ordinal of the declaration that reports a repeated kind.
    ///
    /// That is the second declaration in canonical order; `None` unless the
    /// kind was declared more than once.
    #[must_use]
    pub fn reporter(&self, kind: QuantityKind) -> Option<usize> {
        self.declarations(kind).get(1).map(|tallied| tallied.ordinal)
    }

    /// Returns how many declarations of this kind there are.
    #[must_use]
    pub fn count(&self, kind: QuantityKind) -> usize {
        self.declarations[kind.index()].len()
    }

    /// Returns the total number of declarations.
    #[must_use]
    pub fn total(&self) -> usize {
        self.declarations.iter().map(Vec::len).sum()
    }

    /// Returns the kinds this identity was declared as.
    pub fn kinds(&self) -> impl Iterator<Item = QuantityKind> + '_ {
        QuantityKind::ALL
            .into_iter()
            .filter(|kind| self.count(*kind) > 0)
    }
}

/// Declarations of every identity, per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeclarationTally {
    entries: PersistentMap<TypeIdentity, TallyEntry>,
}

impl DeclarationTally {
    /// Creates an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies every definition; ordinals are positions in `definitions`.
    #[must_use]
    pub fn from_definitions<'a>(definitions: impl IntoIterator<Item = &'a Definition>) -> Self {
        definitions
            .into_iter()
            .map(|d| (d.kind(), d.identity().clone(), d.location().clone()))
            .collect()
    }

    /// Returns the entry of an identity.
    #[must_use]
    pub fn get(&self, identity: &TypeIdentity) -> Option<&TallyEntry> {
        self.entries.get(identity)
    }

    /// Returns how many declarations of `kind` share this identity.
    #[must_use]
    pub fn count(&self, identity: &TypeIdentity, kind: QuantityKind) -> usize {
        self.get(identity).map_or(0, |entry| entry.count(kind))
    }

    /// Returns the total number of declarations of this identity.
    #[must_use]
    pub fn total(&self, identity: &TypeIdentity) -> usize {
        self.get(identity).map_or(0, TallyEntry::total)
    }

    /// Returns true if the identity may enter a registry.
    ///
    /// Identities never tallied are treated as unique.
    #[must_use]
    pub fn is_unique(&self, identity: &TypeIdentity) -> bool {
        self.total(identity) <= 1
    }

    /// Returns identities declared more than once as `kind`.
    pub fn duplicately_defined(&self, kind: QuantityKind) -> impl Iterator<Item = &TypeIdentity> {
        self.entries
            .iter()
            .filter(move |(_, entry)| entry.count(kind) > 1)
            .map(|(identity, _)| identity)
    }

    /// Returns identities declared as more than one kind.
    pub fn conflicting(&self) -> impl Iterator<Item = &TypeIdentity> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.kinds().count() > 1)
            .map(|(identity, _)| identity)
    }

    /// Returns the number of distinct identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was tallied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordinals are positions in the iterator.
impl FromIterator<(QuantityKind, TypeIdentity, SourceLocation)> for DeclarationTally {
    fn from_iter<I: IntoIterator<Item = (QuantityKind, TypeIdentity, SourceLocation)>>(
        iter: I,
    ) -> Self {
        let mut entries = std::collections::BTreeMap::<TypeIdentity, TallyEntry>::new();
        for (ordinal, (kind, identity, location)) in iter.into_iter().enumerate() {
            entries.entry(identity).or_default().declarations[kind.index()]
                .push(Tallied { location, ordinal });
        }
        for entry in entries.values_mut() {
            for declarations in &mut entry.declarations {
                declarations.sort();
            }
        }
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}
