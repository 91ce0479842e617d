//! # Embeddings Provider
//!
//! Converts text into fixed-length vectors by calling an external,
//! OpenAI-compatible embeddings API. Batches are submitted in a single
//! request so that a partial provider response can never leak into the
//! store: a count mismatch fails the whole call.

use crate::errors::RagError;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize, Debug)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize, Debug)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize, Debug)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// A client for an OpenAI-compatible embeddings endpoint.
///
/// One instance is constructed at startup and shared by all request
/// handlers; the embedding model is fixed per deployment so every
/// stored vector has the same dimensionality.
#[derive(Clone, Debug)]
pub struct EmbeddingProvider {
    client: ReqwestClient,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl EmbeddingProvider {
    /// Creates a new `EmbeddingProvider`.
    pub fn new(
        api_url: String,
        model: String,
        api_key: Option<String>,
    ) -> Result<Self, RagError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(RagError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            model,
            api_key,
        })
    }

    /// The model identifier this provider embeds with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generates one embedding per input text, in input order.
    ///
    /// The whole batch is sent as a single request. If the provider
    /// returns a different number of vectors than inputs, the call
    /// fails with [`RagError::EmbeddingCountMismatch`] and nothing is
    /// accepted.
    pub async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input: inputs,
        };
        debug!(
            model = %self.model,
            batch = inputs.len(),
            "--> Sending request to embeddings API"
        );

        let mut request_builder = self.client.post(&self.api_url).json(&request_body);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .send()
            .await
            .map_err(RagError::EmbeddingRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RagError::EmbeddingApi(error_text));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(RagError::EmbeddingDeserialization)?;

        if embedding_response.data.len() != inputs.len() {
            return Err(RagError::EmbeddingCountMismatch {
                expected: inputs.len(),
                got: embedding_response.data.len(),
            });
        }

        // The API reports each vector's position explicitly; order by it
        // rather than trusting the array order.
        let mut data = embedding_response.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    /// Generates an embedding for a single text, used for search queries.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, RagError> {
        let mut vectors = self.embed_batch(&[input.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| RagError::EmbeddingApi("Embeddings API returned no vectors".to_string()))
    }
}
