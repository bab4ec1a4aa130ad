//! Embedder for OpenAI-compatible `/embeddings` endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ingestion::ports::{Embedder, EmbedderError, EmbedderResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP embedder posting `{model, input}` batches.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    /// Creates an embedder for `base_url` (for example `http://host/v1`).
    ///
    /// # Errors
    ///
    /// Returns [`EmbedderError::Request`] when the HTTP client cannot be
    /// built.
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> EmbedderResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(EmbedderError::request)?;
        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: model.into(),
            api_key,
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> EmbedderResult<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_owned()]).await?;
        let actual = vectors.len();
        match vectors.pop() {
            Some(vector) if actual == 1 => Ok(vector),
            _ => Err(EmbedderError::CountMismatch {
                expected: 1,
                actual,
            }),
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> EmbedderResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self.client.post(&self.endpoint).json(&EmbeddingRequest {
            model: &self.model,
            input: texts,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(EmbedderError::request)?;
        let mut body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|err| EmbedderError::InvalidResponse(err.to_string()))?;

        if body.data.len() != texts.len() {
            return Err(EmbedderError::CountMismatch {
                expected: texts.len(),
                actual: body.data.len(),
            });
        }
        body.data.sort_by_key(|item| item.index);
        Ok(body.data.into_iter().map(|item| item.embedding).collect())
    }
}
