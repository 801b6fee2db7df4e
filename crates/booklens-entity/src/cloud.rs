//! Word-cloud cache entry and tag types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use booklens_core::types::UploadId;

/// A ranked word-cloud tag: label plus display weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudTag {
    /// Display label.
    pub label: String,
    /// Weight used for visual sizing.
    pub weight: f64,
}

impl CloudTag {
    /// Construct a tag.
    pub fn new(label: impl Into<String>, weight: f64) -> Self {
        Self {
            label: label.into(),
            weight,
        }
    }
}

/// Scope of a cached aggregate view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheScope {
    /// Word cloud over every comment in the store.
    GlobalWordCloud,
    /// Tag cloud for a single book.
    BookWordCloud(String),
    /// Word cloud scoped to one upload batch.
    UploadWordCloud(UploadId),
}

impl CacheScope {
    /// Discriminator tag stored on cache entries.
    pub fn scope_type(&self) -> &'static str {
        match self {
            Self::GlobalWordCloud => "word_cloud",
            Self::BookWordCloud(_) => "book_word_cloud",
            Self::UploadWordCloud(_) => "upload_word_cloud",
        }
    }

    /// Secondary key for scoped variants.
    pub fn scope_key(&self) -> Option<String> {
        match self {
            Self::GlobalWordCloud => None,
            Self::BookWordCloud(book_id) => Some(book_id.clone()),
            Self::UploadWordCloud(id) => Some(id.to_string()),
        }
    }
}

/// A cached aggregate payload with an expiry.
///
/// Multiple entries for the same scope may coexist; the read path picks the
/// most recently created valid one. Payloads are stored loosely as JSON and
/// coerced on read, so a malformed tag degrades to a dropped element rather
/// than a failed lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Scope discriminator (see [`CacheScope::scope_type`]).
    pub scope_type: String,
    /// Secondary key for scoped entries.
    pub scope_key: Option<String>,
    /// Ordered `[{label, weight}]` payload.
    pub payload: serde_json::Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Expiry timestamp; the entry is valid iff `now < expires_at`.
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether this entry is still valid at `now`.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Whether this entry belongs to the given scope.
    pub fn matches(&self, scope: &CacheScope) -> bool {
        self.scope_type == scope.scope_type() && self.scope_key == scope.scope_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_scope_type_and_key() {
        assert_eq!(CacheScope::GlobalWordCloud.scope_type(), "word_cloud");
        assert_eq!(CacheScope::GlobalWordCloud.scope_key(), None);

        let scope = CacheScope::BookWordCloud("b42".into());
        assert_eq!(scope.scope_type(), "book_word_cloud");
        assert_eq!(scope.scope_key().as_deref(), Some("b42"));
    }

    #[test]
    fn test_entry_validity_and_matching() {
        let now = Utc::now();
        let scope = CacheScope::BookWordCloud("b1".into());
        let entry = CacheEntry {
            scope_type: scope.scope_type().to_string(),
            scope_key: scope.scope_key(),
            payload: serde_json::json!([]),
            created_at: now,
            expires_at: now + TimeDelta::seconds(60),
        };
        assert!(entry.is_valid(now));
        assert!(!entry.is_valid(now + TimeDelta::seconds(61)));
        assert!(entry.matches(&scope));
        assert!(!entry.matches(&CacheScope::BookWordCloud("b2".into())));
        assert!(!entry.matches(&CacheScope::GlobalWordCloud));
    }
}
