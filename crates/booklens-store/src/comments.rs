//! Enriched comment collection and sentiment statistics.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use booklens_entity::CommentRecord;

/// Per-book sentiment counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentStats {
    /// Total comments for the book.
    pub total: u64,
    /// Positive comments.
    pub positive: u64,
    /// Negative comments.
    pub negative: u64,
}

/// Collection of enriched comment records.
#[derive(Debug, Default)]
pub struct CommentCollection {
    records: RwLock<Vec<CommentRecord>>,
}

impl CommentCollection {
    fn read(&self) -> RwLockReadGuard<'_, Vec<CommentRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<CommentRecord>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a batch of records.
    pub fn insert_many(&self, batch: Vec<CommentRecord>) {
        self.write().extend(batch);
    }

    /// Snapshot of every record.
    pub fn all(&self) -> Vec<CommentRecord> {
        self.read().clone()
    }

    /// Records for one book.
    pub fn for_book(&self, book_id: &str) -> Vec<CommentRecord> {
        self.read()
            .iter()
            .filter(|r| r.book_id == book_id)
            .cloned()
            .collect()
    }

    /// Records ingested by one upload batch.
    pub fn for_upload(&self, upload_id: booklens_core::types::UploadId) -> Vec<CommentRecord> {
        self.read()
            .iter()
            .filter(|r| r.upload_id == upload_id)
            .cloned()
            .collect()
    }

    /// Records for any of the given books.
    pub fn for_books(&self, book_ids: &[String]) -> Vec<CommentRecord> {
        self.read()
            .iter()
            .filter(|r| book_ids.iter().any(|id| *id == r.book_id))
            .cloned()
            .collect()
    }

    /// Remove every record belonging to the given books. Returns the number
    /// removed.
    pub fn remove_for_books(&self, book_ids: &[String]) -> usize {
        let mut records = self.write();
        let before = records.len();
        records.retain(|r| !book_ids.iter().any(|id| *id == r.book_id));
        before - records.len()
    }

    /// Sentiment counts for one book. Zeroes when the book has no comments.
    pub fn sentiment_stats(&self, book_id: &str) -> SentimentStats {
        let mut stats = SentimentStats::default();
        for record in self.read().iter().filter(|r| r.book_id == book_id) {
            stats.total += 1;
            if record.sentiment.is_positive() {
                stats.positive += 1;
            } else {
                stats.negative += 1;
            }
        }
        stats
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
