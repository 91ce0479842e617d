//! # Ingestion Pipeline
//!
//! Orchestrates one text submission end to end: validate, chunk, embed
//! the whole batch in one call, then insert the whole batch in one
//! call. Nothing is written to the store until every chunk has a
//! vector, so a failed ingestion never leaves partial rows behind.
//!
//! Ingestion is deliberately not idempotent: re-submitting the same
//! text appends a fresh set of chunks.

use crate::{
    chunk::{chunk_text, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE},
    errors::RagError,
    providers::{ai::EmbeddingProvider, db::PostgrestProvider},
    types::{Metadata, NewDocumentChunk},
};
use serde_json::Value;
use tracing::info;

/// Caller-controlled knobs for one ingestion call.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Free-text label identifying the originating document or upload.
    pub source: String,
    /// Caller-supplied metadata, merged into every chunk's metadata
    /// alongside the embedding model id.
    pub metadata: Metadata,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            source: "manual_ingest".to_string(),
            metadata: Metadata::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// Chunks, embeds, and stores one text submission.
///
/// Returns the number of chunks persisted. Fails with
/// [`RagError::EmptyContent`] before any external call when the text is
/// blank; any embedding or store failure aborts the call with nothing
/// persisted.
pub async fn ingest_text(
    store: &PostgrestProvider,
    embedder: &EmbeddingProvider,
    text: &str,
    options: IngestOptions,
) -> Result<usize, RagError> {
    let chunks = chunk_text(text, options.chunk_size, options.chunk_overlap);
    if chunks.is_empty() {
        return Err(RagError::EmptyContent);
    }

    // One batch request; a count mismatch fails here, before any write.
    let embeddings = embedder.embed_batch(&chunks).await?;

    let model = embedder.model().to_string();
    let rows: Vec<NewDocumentChunk> = chunks
        .into_iter()
        .zip(embeddings)
        .enumerate()
        .map(|(chunk_index, (content, embedding))| {
            let mut metadata = options.metadata.clone();
            metadata.insert("model".to_string(), Value::String(model.clone()));
            NewDocumentChunk {
                content,
                source: options.source.clone(),
                chunk_index,
                metadata,
                embedding,
            }
        })
        .collect();

    store.insert_chunks(&rows).await?;
    info!(
        count = rows.len(),
        source = %options.source,
        "Ingested chunk batch"
    );
    Ok(rows.len())
}
