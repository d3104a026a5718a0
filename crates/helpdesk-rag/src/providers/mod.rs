//! Provider abstractions for embeddings, LLM calls, and vector storage
//!
//! The pipeline core talks to its external collaborators only through these
//! traits, so backends can be swapped (and mocked in tests) without touching
//! the triage, retrieval, or synthesis logic.

pub mod embedding;
pub mod llm;
pub mod local;
pub mod ollama;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use local::LocalVectorStore;
pub use ollama::{OllamaEmbedder, OllamaLlm, OllamaProvider};
pub use vector_store::VectorStoreProvider;
