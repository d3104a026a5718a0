//! Error types for the assistant pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Assistant pipeline errors
///
/// Empty retrieval is deliberately NOT represented here: zero matches for a
/// (query, category) pair propagates as an empty match list and the
/// synthesizer still runs. The model's fixed refusal answer is a successful
/// response, never an `Error`.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Triage classification call failed (model error or timeout).
    /// Distinct from the no-keyword-match case, which defaults to `general`.
    #[error("Classification failed: {0}")]
    Classification(String),

    /// Embedding generation failed
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector store error
    #[error("Vector store error: {0}")]
    VectorStore(String),

    /// Raw LLM call error (wrapped into `Classification` or `Synthesis`
    /// by the stage that issued the call)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Answer generation failed or the token stream aborted mid-answer
    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    /// Document ingestion error
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a vector store error
    pub fn vector_store(message: impl Into<String>) -> Self {
        Self::VectorStore(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Wrap an LLM-stage error as a fatal classification failure
    pub fn classification(source: &Error) -> Self {
        Self::Classification(source.to_string())
    }

    /// Wrap an LLM-stage error as a fatal synthesis failure
    pub fn synthesis(source: &Error) -> Self {
        Self::Synthesis(source.to_string())
    }
}
