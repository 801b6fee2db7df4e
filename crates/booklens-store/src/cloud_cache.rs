//! Word-cloud cache entry collection.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use booklens_entity::{CacheEntry, CacheScope};

/// Append-only collection of cached aggregate payloads.
///
/// No uniqueness is enforced per scope; stale entries for the same scope may
/// coexist and the read path selects the most recently created valid one.
#[derive(Debug, Default)]
pub struct CloudCacheCollection {
    entries: RwLock<Vec<CacheEntry>>,
}

impl CloudCacheCollection {
    fn read(&self) -> RwLockReadGuard<'_, Vec<CacheEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a new entry.
    pub fn insert(&self, entry: CacheEntry) {
        self.write().push(entry);
    }

    /// Newest valid entry for the given scope at `now`, if any.
    pub fn newest_valid(&self, scope: &CacheScope, now: DateTime<Utc>) -> Option<CacheEntry> {
        self.read()
            .iter()
            .filter(|e| e.matches(scope) && e.is_valid(now))
            .max_by_key(|e| e.created_at)
            .cloned()
    }

    /// Drop every entry whose scope key matches one of the given keys.
    /// Returns the number dropped.
    pub fn invalidate_keys(&self, keys: &[String]) -> usize {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|e| {
            e.scope_key
                .as_ref()
                .is_none_or(|k| !keys.iter().any(|key| key == k))
        });
        before - entries.len()
    }

    /// Drop entries that have expired as of `now`. Returns the number dropped.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|e| e.is_valid(now));
        before - entries.len()
    }

    /// Number of entries, valid or not.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
