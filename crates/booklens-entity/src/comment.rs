//! Enriched comment record entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use booklens_core::traits::{Enrichment, Sentiment};
use booklens_core::types::UploadId;

/// One reader comment together with its NLP enrichment, associated with the
/// originating book identity and the upload batch that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Comment identity from the source data.
    pub comment_id: String,
    /// Book this comment belongs to.
    pub book_id: String,
    /// Upload batch that ingested this record.
    pub upload_id: UploadId,
    /// Commenting user, if present in the source file.
    pub user: Option<String>,
    /// Raw comment text.
    pub content: String,
    /// Star rating from the source file, if any.
    pub rating: Option<String>,
    /// Extractive summary.
    pub summary: String,
    /// Extracted keywords.
    pub keywords: Vec<String>,
    /// Topical labels feeding the word clouds.
    pub labels: Vec<String>,
    /// Sentiment classification.
    pub sentiment: Sentiment,
    /// When the record was written.
    pub created_at: DateTime<Utc>,
}

impl CommentRecord {
    /// Combine a raw comment row with its enrichment output.
    pub fn from_enrichment(
        comment_id: String,
        book_id: String,
        upload_id: UploadId,
        user: Option<String>,
        content: String,
        rating: Option<String>,
        enrichment: Enrichment,
    ) -> Self {
        Self {
            comment_id,
            book_id,
            upload_id,
            user,
            content,
            rating,
            summary: enrichment.summary,
            keywords: enrichment.keywords,
            labels: enrichment.labels,
            sentiment: enrichment.sentiment,
            created_at: Utc::now(),
        }
    }
}
