//! Cached word-cloud views and per-book sentiment statistics.

use std::sync::Arc;
use std::time::Duration;

use booklens_cache::{builders, AggregateCache};
use booklens_core::config::CacheConfig;
use booklens_core::types::UploadId;
use booklens_core::{AppError, AppResult};
use booklens_entity::{CacheScope, CloudTag};
use booklens_store::comments::SentimentStats;
use booklens_store::DocumentStore;

/// Serves the three aggregate views through the cache-or-compute layer.
#[derive(Debug, Clone)]
pub struct CloudService {
    store: Arc<DocumentStore>,
    cache: AggregateCache,
    config: CacheConfig,
}

impl CloudService {
    pub fn new(store: Arc<DocumentStore>, config: CacheConfig) -> Self {
        let cache = AggregateCache::new(Arc::clone(&store));
        Self {
            store,
            cache,
            config,
        }
    }

    /// Word cloud over every comment in the store.
    pub async fn global_cloud(&self) -> AppResult<Vec<CloudTag>> {
        let store = Arc::clone(&self.store);
        self.cache
            .get_or_compute(
                CacheScope::GlobalWordCloud,
                Duration::from_secs(self.config.global_ttl_seconds),
                move || async move { Ok(builders::global_word_cloud(&store.comments.all())) },
            )
            .await
    }

    /// Tag cloud for one book.
    pub async fn book_cloud(&self, book_id: &str) -> AppResult<Vec<CloudTag>> {
        let store = Arc::clone(&self.store);
        let owned_id = book_id.to_string();
        self.cache
            .get_or_compute(
                CacheScope::BookWordCloud(book_id.to_string()),
                Duration::from_secs(self.config.book_ttl_seconds),
                move || async move { Ok(builders::book_tag_cloud(&store.comments.for_book(&owned_id))) },
            )
            .await
    }

    /// Word cloud scoped to one upload batch.
    pub async fn upload_cloud(&self, id: UploadId) -> AppResult<Vec<CloudTag>> {
        let job = self
            .store
            .uploads
            .get(id)
            .ok_or_else(|| AppError::not_found(format!("upload {id} not found")))?;
        let total_books = job.book_ids.len();

        let store = Arc::clone(&self.store);
        self.cache
            .get_or_compute(
                CacheScope::UploadWordCloud(id),
                Duration::from_secs(self.config.upload_ttl_seconds),
                move || async move {
                    Ok(builders::upload_word_cloud(
                        &store.comments.for_upload(id),
                        total_books,
                    ))
                },
            )
            .await
    }

    /// Sentiment counts for one book. Zeroes when the book has no comments.
    pub fn sentiment_stats(&self, book_id: &str) -> SentimentStats {
        self.store.comments.sentiment_stats(book_id)
    }

    /// Drop expired cache entries. Returns the number dropped.
    pub fn purge_expired(&self) -> usize {
        self.store.cloud_cache.purge_expired(chrono::Utc::now())
    }
}
