//! TTL response cache keyed by query text and variables.

use std::collections::HashMap;
use std::hash::Hasher;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::debug;
use twox_hash::XxHash64;

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    inserted_at: Instant,
    ttl: Duration,
}

/// In-memory TTL cache for raw GraphQL response payloads.
///
/// Eviction is lazy: staleness is checked on lookup, never by a
/// background sweep. Every failure mode behaves as a miss so a cache
/// problem can never surface to the caller.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached payload, evicting it when its age exceeds its TTL.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut guard = self.entries.lock().ok()?;
        let entry = guard.get(key)?;
        if entry.inserted_at.elapsed() > entry.ttl {
            guard.remove(key);
            debug!(key, "cache entry expired");
            return None;
        }
        Some(entry.data.clone())
    }

    /// Insert a payload, unconditionally overwriting any prior entry
    /// at that key and stamping the current time.
    pub fn set(&self, key: &str, data: Value, ttl: Duration) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.insert(
                key.to_string(),
                CacheEntry {
                    data,
                    inserted_at: Instant::now(),
                    ttl,
                },
            );
        }
    }

    /// Drop all entries immediately.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.clear();
        }
    }

    /// Number of entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |guard| guard.len())
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Derive a cache key from the target namespace, query text, and
/// serialized variables.
///
/// Deterministic and order-sensitive; the namespace keeps two
/// publications from ever colliding. No cryptographic strength is
/// needed, the hash exists purely for key compaction.
#[must_use]
pub fn cache_key(namespace: &str, query: &str, variables: &Value) -> String {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(query.as_bytes());
    hasher.write(variables.to_string().as_bytes());
    format!("{namespace}:{:016x}", hasher.finish())
}
