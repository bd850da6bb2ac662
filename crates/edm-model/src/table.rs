//! Per-kind lookup tables.
//!
//! Insertion order is part of the contract: validation walks elements in
//! registration order, and ambiguity candidates are ordered by registration,
//! so the table must never reorder entries.

use crate::binding::Binding;
use crate::element::SchemaElement;
use crate::name::{NameLookup, QualifiedName};
use indexmap::IndexMap;
use indexmap::map::Entry;

/// An ordered `QualifiedName -> Binding` map for one element kind.
#[derive(Debug, Clone)]
pub struct Table<T> {
    entries: IndexMap<QualifiedName, Binding<T>>,
}

impl<T: SchemaElement> Table<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Register one declared element under its qualified name. Returns true
    /// when the name collided with an existing entry. `report` controls
    /// whether the collision attaches a diagnostic (bare-name container
    /// tolerance is the one caller that silences it).
    pub(crate) fn register(&mut self, element: T, report: bool) -> bool {
        match self.entries.entry(element.name().clone()) {
            Entry::Vacant(slot) => {
                slot.insert(Binding::Real(element));
                false
            }
            Entry::Occupied(mut slot) => {
                slot.get_mut().collide(element, report);
                true
            }
        }
    }

    /// Register a colliding element without growing an ambiguity: first
    /// entry wins, the newcomer is dropped. Used by the tolerate policy.
    pub(crate) fn register_first_wins(&mut self, element: T) -> bool {
        match self.entries.entry(element.name().clone()) {
            Entry::Vacant(slot) => {
                slot.insert(Binding::Real(element));
                false
            }
            Entry::Occupied(_) => true,
        }
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&Binding<T>> {
        self.entries.get(name)
    }

    /// Policy-aware lookup. Exact matches win; a case-insensitive policy
    /// falls back to a fold-and-compare scan in insertion order.
    pub fn get_with(&self, name: &QualifiedName, lookup: NameLookup) -> Option<&Binding<T>> {
        if let Some(found) = self.entries.get(name) {
            return Some(found);
        }
        match lookup {
            NameLookup::CaseSensitive => None,
            NameLookup::CaseInsensitive => self
                .entries
                .iter()
                .find(|(key, _)| key.matches_ignore_case(name))
                .map(|(_, binding)| binding),
        }
    }

    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.entries.contains_key(name)
    }

    /// Bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding<T>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn get_index(&self, index: usize) -> Option<&Binding<T>> {
        self.entries.get_index(index).map(|(_, binding)| binding)
    }

    pub(crate) fn get_index_mut(&mut self, index: usize) -> Option<&mut Binding<T>> {
        self.entries.get_index_mut(index).map(|(_, binding)| binding)
    }
}

impl<T: SchemaElement> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}
