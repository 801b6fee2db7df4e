//! HTTP client for the out-of-process enrichment service.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use booklens_core::config::EnrichmentConfig;
use booklens_core::traits::{Enrichment, EnrichmentEngine};
use booklens_core::{AppError, AppResult};

/// Client speaking the enrichment service's batch protocol: one POST with
/// every text in the chunk, one enrichment back per text, in order.
#[derive(Debug, Clone)]
pub struct HttpEnrichmentClient {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct EnrichRequest<'a> {
    texts: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EnrichResponse {
    enrichments: Vec<Enrichment>,
}

impl HttpEnrichmentClient {
    pub fn new(config: &EnrichmentConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl EnrichmentEngine for HttpEnrichmentClient {
    async fn enrich(&self, text: &str) -> AppResult<Enrichment> {
        let texts = [text.to_string()];
        let mut batch = self.enrich_batch(&texts).await?;
        batch
            .pop()
            .ok_or_else(|| AppError::external_service("enrichment service returned no result"))
    }

    async fn enrich_batch(&self, texts: &[String]) -> AppResult<Vec<Enrichment>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .json(&EnrichRequest { texts })
            .send()
            .await?
            .error_for_status()?;
        let body: EnrichResponse = response.json().await?;

        if body.enrichments.len() != texts.len() {
            return Err(AppError::external_service(format!(
                "enrichment service returned {} results for {} texts",
                body.enrichments.len(),
                texts.len()
            )));
        }
        Ok(body.enrichments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booklens_core::traits::Sentiment;

    #[test]
    fn test_request_wire_shape() {
        let texts = vec!["great read".to_string()];
        let json = serde_json::to_value(EnrichRequest { texts: &texts }).expect("serialize");
        assert_eq!(json, serde_json::json!({"texts": ["great read"]}));
    }

    #[test]
    fn test_response_wire_shape() {
        let body = serde_json::json!({
            "enrichments": [{
                "summary": "a short take",
                "keywords": ["pacing"],
                "labels": ["thriller"],
                "sentiment": "positive"
            }]
        });
        let parsed: EnrichResponse = serde_json::from_value(body).expect("deserialize");
        assert_eq!(parsed.enrichments.len(), 1);
        assert_eq!(parsed.enrichments[0].sentiment, Sentiment::Positive);
    }
}
