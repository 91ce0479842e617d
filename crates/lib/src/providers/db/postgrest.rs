//! # Vector Store Gateway
//!
//! A REST gateway to the hosted Postgres knowledge store (PostgREST
//! wire protocol). The store owns durability, atomicity, and the
//! similarity computation; this provider only forwards parameters and
//! shapes the results. Requests authenticate with the deployment's
//! service key.

use crate::{
    errors::RagError,
    types::{MatchDocumentResult, NewDocumentChunk, NewSiteContent, SiteContent},
};
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize, Debug)]
struct MatchDocumentsParams<'a> {
    query_embedding: &'a [f32],
    match_count: u32,
    min_similarity: f64,
    filter_source: Option<&'a str>,
}

#[derive(Deserialize)]
struct RoleRow {
    role: String,
}

/// A client for the store's REST surface.
///
/// Holds the store base URL and service key; constructed once at
/// startup and shared by all handlers.
#[derive(Clone, Debug)]
pub struct PostgrestProvider {
    client: ReqwestClient,
    api_url: String,
    service_key: String,
}

impl PostgrestProvider {
    /// Creates a new `PostgrestProvider` for the store at `api_url`.
    pub fn new(api_url: String, service_key: String) -> Result<Self, RagError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(RagError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            service_key,
        })
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{path}", self.api_url)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, RagError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(RagError::StoreApi { status, message })
    }

    /// Inserts one ingestion batch into the `documents` table.
    ///
    /// The whole batch goes in a single request, so from the caller's
    /// perspective either every chunk of an ingestion is written or
    /// none are.
    pub async fn insert_chunks(&self, chunks: &[NewDocumentChunk]) -> Result<(), RagError> {
        debug!(rows = chunks.len(), "--> Inserting chunk batch into store");
        let response = self
            .authed(self.client.post(self.rest_url("documents")))
            .header("Prefer", "return=minimal")
            .json(chunks)
            .send()
            .await
            .map_err(RagError::StoreRequest)?;
        Self::check(response).await?;
        Ok(())
    }

    /// Runs the store's `match_documents` similarity RPC.
    ///
    /// Returns at most `match_count` rows with similarity at or above
    /// `min_similarity`, in the store's order (descending similarity).
    /// When `filter_source` is set, only chunks from that source are
    /// eligible.
    pub async fn match_documents(
        &self,
        query_embedding: &[f32],
        match_count: u32,
        min_similarity: f64,
        filter_source: Option<&str>,
    ) -> Result<Vec<MatchDocumentResult>, RagError> {
        let params = MatchDocumentsParams {
            query_embedding,
            match_count,
            min_similarity,
            filter_source,
        };
        let response = self
            .authed(self.client.post(self.rest_url("rpc/match_documents")))
            .json(&params)
            .send()
            .await
            .map_err(RagError::StoreRequest)?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(RagError::StoreDeserialization)
    }

    /// Looks up a user's role from the `users` table.
    pub async fn user_role(&self, user_id: &str) -> Result<Option<String>, RagError> {
        let id_filter = format!("eq.{user_id}");
        let response = self
            .authed(self.client.get(self.rest_url("users")))
            .query(&[("select", "role"), ("id", id_filter.as_str())])
            .send()
            .await
            .map_err(RagError::StoreRequest)?;
        let rows: Vec<RoleRow> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(RagError::StoreDeserialization)?;
        Ok(rows.into_iter().next().map(|row| row.role))
    }

    /// Fetches published site content, optionally filtered by section
    /// and/or key.
    pub async fn published_content(
        &self,
        section: Option<&str>,
        key: Option<&str>,
    ) -> Result<Vec<SiteContent>, RagError> {
        let mut query = vec![
            ("select".to_string(), "*".to_string()),
            ("published".to_string(), "eq.true".to_string()),
        ];
        if let Some(section) = section {
            query.push(("section".to_string(), format!("eq.{section}")));
        }
        if let Some(key) = key {
            query.push(("key".to_string(), format!("eq.{key}")));
        }

        let response = self
            .authed(self.client.get(self.rest_url("site_content")))
            .query(&query)
            .send()
            .await
            .map_err(RagError::StoreRequest)?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(RagError::StoreDeserialization)
    }

    /// Creates or updates a content entry, keyed on `(key, locale)`.
    pub async fn upsert_content(&self, entry: &NewSiteContent) -> Result<SiteContent, RagError> {
        let response = self
            .authed(self.client.post(self.rest_url("site_content")))
            .query(&[("on_conflict", "key,locale")])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&[entry])
            .send()
            .await
            .map_err(RagError::StoreRequest)?;
        let mut rows: Vec<SiteContent> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(RagError::StoreDeserialization)?;
        rows.pop().ok_or_else(|| RagError::StoreApi {
            status: 500,
            message: "Upsert returned no representation".to_string(),
        })
    }

    /// Deletes a content entry by id.
    pub async fn delete_content(&self, id: &str) -> Result<(), RagError> {
        let response = self
            .authed(self.client.delete(self.rest_url("site_content")))
            .query(&[("id", &format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .send()
            .await
            .map_err(RagError::StoreRequest)?;
        Self::check(response).await?;
        Ok(())
    }
}
