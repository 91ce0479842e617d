pub mod embedding;
pub mod openai;

use crate::errors::RagError;
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use embedding::EmbeddingProvider;
use futures::Stream;
use std::fmt::Debug;
use std::pin::Pin;

/// A live token stream from a chat-completion provider.
///
/// Each item is one incremental text fragment in arrival order.
/// Dropping the stream closes the underlying connection, so a caller
/// that disconnects mid-answer stops the provider from generating
/// tokens nobody will receive.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, RagError>> + Send>>;

/// A trait for interacting with a chat-completion provider.
///
/// This defines the single seam the retrieval handler depends on:
/// given a composed system prompt and the raw user query, produce a
/// stream of answer tokens.
#[async_trait]
pub trait ChatProvider: Send + Sync + Debug + DynClone {
    /// Issues a deterministic (temperature zero) chat completion and
    /// returns its incremental output.
    ///
    /// The returned stream yields tokens as the provider produces
    /// them; provider failures after streaming has begun surface as an
    /// `Err` item that terminates the stream.
    async fn stream_chat(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<TokenStream, RagError>;
}

dyn_clone::clone_trait_object!(ChatProvider);
