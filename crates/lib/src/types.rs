//! Shared row and projection types for the knowledge store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An open string-keyed metadata mapping with no fixed schema.
///
/// Validated only at the boundary: callers must supply a JSON object,
/// never a bare scalar or array.
pub type Metadata = Map<String, Value>;

/// A chunk row as written to the `documents` table during ingestion.
///
/// The store assigns the row id and timestamps; this type carries only
/// the caller-controlled columns.
#[derive(Debug, Clone, Serialize)]
pub struct NewDocumentChunk {
    pub content: String,
    pub source: String,
    pub chunk_index: usize,
    pub metadata: Metadata,
    pub embedding: Vec<f32>,
}

/// A stored unit of ingested knowledge, as read back from the store.
///
/// Chunks are immutable once written; repeated ingestion of the same
/// text appends new rows rather than replacing old ones.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentChunk {
    pub id: String,
    pub content: String,
    pub source: Option<String>,
    pub chunk_index: usize,
    #[serde(default)]
    pub metadata: Metadata,
    pub embedding: Vec<f32>,
}

/// One row of a similarity-search result, as returned by the store's
/// `match_documents` RPC. Ephemeral: reconstructed per query, never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDocumentResult {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub source: Option<String>,
    pub chunk_index: usize,
    /// Similarity score in the store's comparable range, descending in
    /// the result ordering.
    pub similarity: f64,
}

/// A keyed, localized site content entry. Uniqueness is on
/// `(key, locale)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteContent {
    pub id: String,
    pub key: String,
    pub locale: String,
    pub section: String,
    pub title: Option<String>,
    pub body: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub published: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// The caller-controlled columns of a content upsert.
#[derive(Debug, Clone, Serialize)]
pub struct NewSiteContent {
    pub key: String,
    pub locale: String,
    pub section: String,
    pub title: Option<String>,
    pub body: String,
    pub metadata: Metadata,
    pub published: bool,
}
