//! Entry registry
//!
//! The ordered set of live entries in a store. Names are unique; callers
//! check [`Registry::exists`] before appending.

use std::collections::HashSet;

use crate::entry::Entry;

/// Ordered collection of live entries
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<Entry>,
    names: HashSet<String>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from entries, keeping the first of any duplicate names
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut registry = Self::new();
        for entry in entries {
            if !registry.exists(&entry.name) {
                registry.append(entry);
            }
        }
        registry
    }

    /// Check whether a live entry has this name
    pub fn exists(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Look up an entry by name
    pub fn find(&self, name: &str) -> Option<&Entry> {
        if !self.exists(name) {
            return None;
        }
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Add an entry at the end
    ///
    /// The caller must already have checked that the name is free.
    pub fn append(&mut self, entry: Entry) {
        debug_assert!(!self.exists(&entry.name), "duplicate entry {}", entry.name);
        self.names.insert(entry.name.clone());
        self.entries.push(entry);
    }

    /// All entries in order
    pub fn all(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove `target` and every entry it contains, returning how many went
    pub fn remove_contained(&mut self, target: &Entry) -> usize {
        let before = self.entries.len();
        let names = &mut self.names;
        self.entries.retain(|entry| {
            let keep = !target.contains(&entry.name);
            if !keep {
                names.remove(&entry.name);
            }
            keep
        });
        before - self.entries.len()
    }

    /// Replace the order of entries
    ///
    /// `entries` must hold exactly the current entries.
    pub fn reorder(&mut self, entries: Vec<Entry>) {
        debug_assert_eq!(entries.len(), self.entries.len());
        self.entries = entries;
    }
}
