//! # ragsite
//!
//! The retrieval-augmented-generation core behind the site: text
//! chunking, embedding generation, the vector-store gateway, and the
//! prompt plumbing that grounds a streamed chat completion in
//! previously ingested chunks.
//!
//! The heavy lifting (vector similarity, token generation, identity)
//! lives in external services; this crate is the typed orchestration
//! layer in front of them.

pub mod chunk;
pub mod errors;
pub mod ingest;
pub mod prompts;
pub mod providers;
pub mod types;

pub use chunk::chunk_text;
pub use errors::RagError;
pub use ingest::{ingest_text, IngestOptions};
pub use providers::{
    ai::{ChatProvider, EmbeddingProvider, TokenStream},
    db::PostgrestProvider,
    identity::IdentityProvider,
};
pub use types::{DocumentChunk, MatchDocumentResult, Metadata, NewDocumentChunk, SiteContent};
