//! Remote embedder for OpenAI-compatible `/embeddings` endpoints.
//!
//! A failed call is reported once; the pipeline does not retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{expect_count, Embedder, EmbedderError, Embedding};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpEmbedder {
    pub fn new(
        url: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, EmbedderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbedderError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            model,
            api_key,
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn name(&self) -> &str {
        "http"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self.client.post(&self.url).json(&EmbeddingRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EmbedderError::Unavailable(format!("request to {} failed: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(EmbedderError::Unavailable(format!(
                "status {}: {message}",
                status.as_u16()
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbedderError::Malformed(e.to_string()))?;

        debug!("Remote embedder returned {} vectors", body.data.len());

        into_ordered(body, texts.len())
    }
}

/// Puts vectors back in input order using `index` when the server sends it.
fn into_ordered(response: EmbeddingResponse, expected: usize) -> Result<Vec<Embedding>, EmbedderError> {
    let mut data = response.data;
    if data.iter().all(|d| d.index.is_some()) {
        data.sort_by_key(|d| d.index);
        let in_range = data
            .iter()
            .enumerate()
            .all(|(position, d)| d.index == Some(position));
        if !in_range {
            let indices: Vec<_> = data.iter().filter_map(|d| d.index).collect();
            return Err(EmbedderError::Malformed(format!(
                "unexpected embedding indices {indices:?}"
            )));
        }
    }
    expect_count(data.into_iter().map(|d| d.embedding).collect(), expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> EmbeddingResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_response_reordered_by_index() {
        let response = parse(
            r#"{"data": [
                {"embedding": [0.0, 1.0], "index": 1},
                {"embedding": [1.0, 0.0], "index": 0}
            ]}"#,
        );
        let vectors = into_ordered(response, 2).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_response_without_index_kept_in_order() {
        let response = parse(r#"{"data": [{"embedding": [0.5]}, {"embedding": [0.25]}]}"#);
        assert_eq!(into_ordered(response, 2).unwrap(), vec![vec![0.5], vec![0.25]]);
    }

    #[test]
    fn test_gap_in_indices_is_malformed() {
        let response = parse(
            r#"{"data": [{"embedding": [0.5], "index": 0}, {"embedding": [0.25], "index": 5}]}"#,
        );
        assert!(matches!(into_ordered(response, 2), Err(EmbedderError::Malformed(_))));
    }

    #[test]
    fn test_wrong_count_is_malformed() {
        let response = parse(r#"{"data": [{"embedding": [0.5], "index": 0}]}"#);
        assert!(matches!(into_ordered(response, 3), Err(EmbedderError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        let embedder = HttpEmbedder::new(
            "http://127.0.0.1:1/v1/embeddings".to_string(),
            "all-MiniLM-L6-v2".to_string(),
            None,
            Duration::from_secs(2),
        )
        .unwrap();
        let err = embedder.embed(&["hello".to_string()]).await.unwrap_err();
        assert!(matches!(err, EmbedderError::Unavailable(_)), "got {err:?}");
    }
}
