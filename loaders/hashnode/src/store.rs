//! Content store handoff contract.

use std::collections::HashMap;

use serde_json::Value;

/// One validated entry handed to the hosting build system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    /// Stable id, unique within the collection.
    pub id: String,
    /// Validated payload in the local schema.
    pub data: Value,
    /// Deterministic content hash used for change detection.
    pub digest: String,
    /// Pre-rendered HTML passthrough so the host can skip re-rendering.
    pub rendered_html: Option<String>,
}

/// The hosting build system's content store.
///
/// The store owns persistence and its own change-detection strategy;
/// the loader only produces digested entries.
pub trait ContentStore {
    /// Submit an entry. Returns whether it was actually written, as
    /// opposed to skipped because the store judged it unchanged.
    fn set(&mut self, entry: StoredEntry) -> bool;
}

/// In-memory store with digest-based skip, used by tests and demos.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, StoredEntry>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&StoredEntry> {
        self.entries.get(id)
    }

    /// Number of entries held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ContentStore for MemoryStore {
    fn set(&mut self, entry: StoredEntry) -> bool {
        if let Some(existing) = self.entries.get(&entry.id) {
            if existing.digest == entry.digest {
                return false;
            }
        }
        self.entries.insert(entry.id.clone(), entry);
        true
    }
}
