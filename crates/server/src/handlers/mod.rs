//! # API Route Handlers
//!
//! Axum route handlers for `ragsite-server`, split into logical
//! sub-modules: ingestion, retrieval/chat, site content, lead capture,
//! and liveness probes.

pub mod chat;
pub mod content;
pub mod general;
pub mod ingest;
pub mod leads;

pub use chat::*;
pub use content::*;
pub use general::*;
pub use ingest::*;
pub use leads::*;

// Shared items used by multiple handler modules.
use super::{errors::AppError, state::AppState};
