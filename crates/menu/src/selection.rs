use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::{Recipe, Slot};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectionKey {
    pub day: u8,
    pub slot: Slot,
}

impl SelectionKey {
    pub fn new(day: u8, slot: Slot) -> Self {
        Self { day, slot }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub day: u8,
    pub slot: Slot,
    pub recipe: Recipe,
}

/// Chosen recipes keyed by (day, slot), kept in the order they were chosen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionMap {
    entries: IndexMap<SelectionKey, Selection>,
}

impl SelectionMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: SelectionKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn get(&self, key: SelectionKey) -> Option<&Selection> {
        self.entries.get(&key)
    }

    pub(crate) fn get_mut(&mut self, key: SelectionKey) -> Option<&mut Selection> {
        self.entries.get_mut(&key)
    }

    /// Returns false when the key was already selected.
    pub(crate) fn insert(&mut self, day: u8, slot: Slot, recipe: Recipe) -> bool {
        let key = SelectionKey::new(day, slot);
        if self.entries.contains_key(&key) {
            return false;
        }

        self.entries.insert(key, Selection { day, slot, recipe });
        true
    }

    /// Returns false when the key was not selected.
    pub(crate) fn remove(&mut self, key: SelectionKey) -> bool {
        self.entries.shift_remove(&key).is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Selections in the order they were made.
    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = SelectionKey> + '_ {
        self.entries.keys().copied()
    }

    pub fn by_day(&self) -> Vec<&Selection> {
        let mut selections = self.entries.values().collect::<Vec<_>>();
        selections.sort_by_key(|s| (s.day, s.slot));
        selections
    }

    pub fn days(&self) -> BTreeSet<u8> {
        self.entries.keys().map(|k| k.day).collect()
    }
}
