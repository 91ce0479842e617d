use thiserror::Error;

/// Custom error types for the RAG core.
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Request to embedding provider failed: {0}")]
    EmbeddingRequest(reqwest::Error),
    #[error("Failed to deserialize embedding response: {0}")]
    EmbeddingDeserialization(reqwest::Error),
    #[error("Embedding provider returned an error: {0}")]
    EmbeddingApi(String),
    #[error("Embedding provider returned {got} vectors for {expected} inputs")]
    EmbeddingCountMismatch { expected: usize, got: usize },
    #[error("Request to chat provider failed: {0}")]
    ChatRequest(reqwest::Error),
    #[error("Chat provider returned an error: {0}")]
    ChatApi(String),
    #[error("Chat completion stream failed: {0}")]
    ChatStream(reqwest::Error),
    #[error("Vector store request failed: {0}")]
    StoreRequest(reqwest::Error),
    #[error("Vector store returned an error ({status}): {message}")]
    StoreApi { status: u16, message: String },
    #[error("Failed to deserialize vector store response: {0}")]
    StoreDeserialization(reqwest::Error),
    #[error("Request to identity provider failed: {0}")]
    IdentityRequest(reqwest::Error),
    #[error("Identity provider rejected the credential ({status}): {message}")]
    IdentityApi { status: u16, message: String },
    #[error("Failed to deserialize identity provider response: {0}")]
    IdentityDeserialization(reqwest::Error),
    #[error("Text content is empty or only whitespace")]
    EmptyContent,
}
