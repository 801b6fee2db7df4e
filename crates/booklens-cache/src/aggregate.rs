//! Get-or-compute cache over the document store's cache entries.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use tracing::debug;

use booklens_core::result::AppResult;
use booklens_entity::{CacheEntry, CacheScope, CloudTag};
use booklens_store::DocumentStore;

/// Generic get-or-compute cache keyed by [`CacheScope`].
///
/// On a hit the stored payload is coerced back into tags; on a miss the
/// compute function runs synchronously and its result is inserted with
/// `expires_at = now + ttl`. Concurrent misses for the same scope are not
/// deduplicated: recompute is idempotent and cheap relative to ingestion,
/// and the read path tolerates coexisting entries.
#[derive(Debug, Clone)]
pub struct AggregateCache {
    store: Arc<DocumentStore>,
}

impl AggregateCache {
    /// Create a cache over the given store.
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Return the cached payload for `scope` if a valid entry exists,
    /// otherwise invoke `compute`, cache its result for `ttl`, and return it.
    pub async fn get_or_compute<F, Fut>(
        &self,
        scope: CacheScope,
        ttl: Duration,
        compute: F,
    ) -> AppResult<Vec<CloudTag>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Vec<CloudTag>>>,
    {
        let now = Utc::now();
        if let Some(entry) = self.store.cloud_cache.newest_valid(&scope, now) {
            debug!(scope_type = scope.scope_type(), "aggregate cache hit");
            return Ok(coerce_tags(&entry.payload));
        }

        debug!(scope_type = scope.scope_type(), "aggregate cache miss; recomputing");
        let tags = compute().await?;

        let entry = CacheEntry {
            scope_type: scope.scope_type().to_string(),
            scope_key: scope.scope_key(),
            payload: serde_json::to_value(&tags)?,
            created_at: now,
            expires_at: now + ttl_delta(ttl),
        };
        self.store.cloud_cache.insert(entry);

        Ok(tags)
    }
}

fn ttl_delta(ttl: Duration) -> TimeDelta {
    TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX)
}

/// Coerce a stored payload back into tags.
///
/// Labels are coerced to strings and weights to floats; an element missing
/// either field is dropped rather than failing the whole read.
pub fn coerce_tags(payload: &serde_json::Value) -> Vec<CloudTag> {
    let Some(items) = payload.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let label = match item.get("label")? {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                _ => return None,
            };
            let weight = match item.get("weight")? {
                serde_json::Value::Number(n) => n.as_f64()?,
                serde_json::Value::String(s) => s.parse::<f64>().ok()?,
                _ => return None,
            };
            Some(CloudTag { label, weight })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tags() -> Vec<CloudTag> {
        vec![CloudTag::new("space", 10.0), CloudTag::new("opera", 4.0)]
    }

    #[tokio::test]
    async fn test_second_read_within_ttl_skips_compute() {
        let cache = AggregateCache::new(Arc::new(DocumentStore::new()));
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let result = cache
                .get_or_compute(CacheScope::GlobalWordCloud, Duration::from_secs(60), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok(tags()) }
                })
                .await
                .expect("get_or_compute");
            assert_eq!(result, tags());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_recompute() {
        let cache = AggregateCache::new(Arc::new(DocumentStore::new()));
        let calls = AtomicUsize::new(0);

        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(tags()) }
        };

        cache
            .get_or_compute(
                CacheScope::GlobalWordCloud,
                Duration::from_millis(30),
                compute,
            )
            .await
            .expect("first");

        tokio::time::sleep(Duration::from_millis(60)).await;

        cache
            .get_or_compute(
                CacheScope::GlobalWordCloud,
                Duration::from_millis(30),
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok(tags()) }
                },
            )
            .await
            .expect("second");

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_compute_failure_propagates_without_insert() {
        let store = Arc::new(DocumentStore::new());
        let cache = AggregateCache::new(Arc::clone(&store));

        let err = cache
            .get_or_compute(CacheScope::GlobalWordCloud, Duration::from_secs(60), || {
                async { Err(booklens_core::AppError::internal("recompute blew up")) }
            })
            .await
            .expect_err("should propagate");
        assert_eq!(err.kind, booklens_core::error::ErrorKind::Internal);
        assert!(store.cloud_cache.is_empty());
    }

    #[test]
    fn test_coerce_drops_malformed_and_converts_types() {
        let payload = serde_json::json!([
            {"label": "good", "weight": 3},
            {"label": "stringy", "weight": "2.5"},
            {"label": 42, "weight": 1.0},
            {"label": "no-weight"},
            {"weight": 9.0},
            "not-an-object"
        ]);

        let tags = coerce_tags(&payload);
        assert_eq!(
            tags,
            vec![
                CloudTag::new("good", 3.0),
                CloudTag::new("stringy", 2.5),
                CloudTag::new("42", 1.0),
            ]
        );
    }

    #[test]
    fn test_coerce_non_array_is_empty() {
        assert!(coerce_tags(&serde_json::json!({"tags": []})).is_empty());
    }
}
