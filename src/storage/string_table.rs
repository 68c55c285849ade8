//! String interning for symbol names, kind names, and file paths.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Deduplicating string table.
///
/// `intern` returns the existing id for an already-seen string, otherwise
/// the next sequential id. Ids are stable once assigned for the lifetime of
/// the owning store; they are never reused or renumbered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StringTable {
    strings: Vec<String>,
    /// Rebuilt after deserialization; only `strings` is persisted.
    #[serde(skip)]
    lookup: HashMap<String, u32>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its stable id.
    pub fn intern(&mut self, s: &str) -> u32 {
        if let Some(&id) = self.lookup.get(s) {
            return id;
        }
        let id = self.strings.len() as u32;
        self.strings.push(s.to_string());
        self.lookup.insert(s.to_string(), id);
        id
    }

    /// Look up a string without interning it.
    pub fn get(&self, s: &str) -> Option<u32> {
        self.lookup.get(s).copied()
    }

    /// Resolve an id back to its string. Defined only for ids previously
    /// returned by `intern`.
    pub fn resolve(&self, id: u32) -> Option<&str> {
        self.strings.get(id as usize).map(String::as_str)
    }

    /// All interned strings, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Restore the reverse lookup after deserialization.
    pub(crate) fn rebuild_lookup(&mut self) {
        self.lookup = self
            .strings
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i as u32))
            .collect();
    }
}
