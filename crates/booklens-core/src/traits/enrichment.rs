//! Enrichment engine trait for the out-of-process NLP stage.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// Sentiment classification of a single comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Positive comment.
    Positive,
    /// Negative comment.
    Negative,
}

impl Sentiment {
    /// Whether this is a positive classification.
    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Positive)
    }
}

/// NLP-derived fields computed per comment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    /// Extractive summary of the comment.
    pub summary: String,
    /// Extracted keywords.
    pub keywords: Vec<String>,
    /// Topical labels (the word-cloud source).
    pub labels: Vec<String>,
    /// Sentiment classification.
    pub sentiment: Sentiment,
}

/// Trait for the enrichment stage.
///
/// Invoked per record (batched internally for throughput); expected to be
/// slow and resource-heavy, running out of process. Implementations must
/// return exactly one [`Enrichment`] per input text, in order.
#[async_trait]
pub trait EnrichmentEngine: Send + Sync + std::fmt::Debug + 'static {
    /// Enrich a single comment text.
    async fn enrich(&self, text: &str) -> AppResult<Enrichment>;

    /// Enrich a batch of comment texts. The default implementation calls
    /// [`enrich`](Self::enrich) per record; remote implementations should
    /// override it with one round trip.
    async fn enrich_batch(&self, texts: &[String]) -> AppResult<Vec<Enrichment>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.enrich(text).await?);
        }
        Ok(out)
    }
}
