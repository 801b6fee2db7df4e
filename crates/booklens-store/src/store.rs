//! The document store facade and the multi-collection cascade delete.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::info;

use booklens_core::result::AppResult;
use booklens_core::types::UploadId;
use booklens_entity::CommentRecord;

use crate::books::BookCollection;
use crate::cloud_cache::CloudCacheCollection;
use crate::comments::CommentCollection;
use crate::uploads::UploadCollection;

/// What a cascade delete removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Books removed.
    pub deleted_books: usize,
    /// Comment records removed.
    pub deleted_comments: usize,
    /// Cache entries invalidated.
    pub invalidated_cache_entries: usize,
}

/// The shared document store.
///
/// Individual collections serialize their own conflicting writes; the
/// cascade delete takes the store-wide write gate so its removals across
/// collections are observed all-or-nothing.
#[derive(Debug, Default)]
pub struct DocumentStore {
    /// Upload job records.
    pub uploads: UploadCollection,
    /// Book metadata.
    pub books: BookCollection,
    /// Enriched comment records.
    pub comments: CommentCollection,
    /// Cached aggregate views.
    pub cloud_cache: CloudCacheCollection,
    write_gate: Mutex<()>,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn gate(&self) -> MutexGuard<'_, ()> {
        self.write_gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append enriched records for an upload, verifying the job still
    /// exists.
    ///
    /// Holds the write gate, so the existence check and the insert are
    /// atomic with respect to [`delete_upload_cascade`]: records either land
    /// before a cascade (which then removes them) or the append fails with
    /// `NotFound`. A job deleted mid-run therefore never leaves orphan
    /// comments behind.
    ///
    /// [`delete_upload_cascade`]: Self::delete_upload_cascade
    pub fn append_comments(
        &self,
        upload_id: UploadId,
        batch: Vec<CommentRecord>,
    ) -> AppResult<usize> {
        let _gate = self.gate();

        if self.uploads.get(upload_id).is_none() {
            return Err(booklens_core::AppError::not_found(format!(
                "upload {upload_id} not found"
            )));
        }

        let appended = batch.len();
        self.comments.insert_many(batch);
        Ok(appended)
    }

    /// Delete an upload job together with every domain record derived from
    /// it: the books whose identities the job ingested, their comment
    /// records, and any cache entries scoped to those identities or to the
    /// upload itself.
    ///
    /// All lookups happen before the first removal; an unknown job id
    /// returns `NotFound` with nothing touched. Once removal starts, every
    /// step is infallible, so the transaction cannot half-apply.
    pub fn delete_upload_cascade(&self, id: UploadId) -> AppResult<CascadeReport> {
        let _gate = self.gate();

        let job = self
            .uploads
            .get(id)
            .ok_or_else(|| booklens_core::AppError::not_found(format!("upload {id} not found")))?;
        let book_ids = job.book_ids.clone();

        let mut cache_keys: Vec<String> = book_ids.clone();
        cache_keys.push(id.to_string());

        self.uploads.remove(id);
        let deleted_books = self.books.remove_many(&book_ids);
        let deleted_comments = self.comments.remove_for_books(&book_ids);
        let invalidated_cache_entries = self.cloud_cache.invalidate_keys(&cache_keys);

        info!(
            upload_id = %id,
            deleted_books,
            deleted_comments,
            invalidated_cache_entries,
            "cascade delete complete"
        );

        Ok(CascadeReport {
            deleted_books,
            deleted_comments,
            invalidated_cache_entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booklens_core::error::ErrorKind;
    use booklens_core::traits::{Enrichment, Sentiment};
    use booklens_entity::{Book, CommentRecord, UploadJob};

    fn seed(store: &DocumentStore) -> UploadJob {
        let job = UploadJob::new("batch.csv", 100, 2, vec!["b1".into(), "b2".into()]);
        store.uploads.insert(job.clone());
        for (book_id, title) in [("b1", "Dune"), ("b2", "Solaris")] {
            store.books.upsert(Book {
                book_id: book_id.into(),
                book_title: title.into(),
                author: None,
                cover_url: None,
                publisher: None,
                pub_year: None,
                book_url: None,
            });
            store.comments.insert_many(vec![CommentRecord::from_enrichment(
                format!("c-{book_id}"),
                book_id.into(),
                job.id,
                None,
                "text".into(),
                None,
                Enrichment {
                    summary: "text".into(),
                    keywords: vec![],
                    labels: vec!["classic".into()],
                    sentiment: Sentiment::Positive,
                },
            )]);
        }
        job
    }

    #[test]
    fn test_cascade_removes_job_books_and_comments() {
        let store = DocumentStore::new();
        let job = seed(&store);

        let report = store.delete_upload_cascade(job.id).expect("cascade");
        assert_eq!(report.deleted_books, 2);
        assert_eq!(report.deleted_comments, 2);
        assert!(store.uploads.get(job.id).is_none());
        assert!(store.books.is_empty());
        assert!(store.comments.is_empty());
    }

    #[test]
    fn test_append_comments_requires_live_job() {
        let store = DocumentStore::new();
        let job = seed(&store);

        let record = CommentRecord::from_enrichment(
            "c-late".into(),
            "b1".into(),
            job.id,
            None,
            "arrived late".into(),
            None,
            Enrichment {
                summary: "arrived late".into(),
                keywords: vec![],
                labels: vec!["classic".into()],
                sentiment: Sentiment::Negative,
            },
        );

        let appended = store
            .append_comments(job.id, vec![record.clone()])
            .expect("append while job lives");
        assert_eq!(appended, 1);
        assert_eq!(store.comments.len(), 3);

        store.delete_upload_cascade(job.id).expect("cascade");

        let err = store
            .append_comments(job.id, vec![record])
            .expect_err("append after delete");
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(store.comments.is_empty());
    }

    #[test]
    fn test_cascade_unknown_id_leaves_everything_untouched() {
        let store = DocumentStore::new();
        let _job = seed(&store);

        let err = store
            .delete_upload_cascade(UploadId::new())
            .expect_err("unknown id");
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(store.uploads.len(), 1);
        assert_eq!(store.books.len(), 2);
        assert_eq!(store.comments.len(), 2);
    }
}
