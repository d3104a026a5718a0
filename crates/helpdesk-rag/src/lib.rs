//! helpdesk-rag: triage-routed RAG assistant with citation-backed answers
//!
//! Queries are classified into a support category, matching documents are
//! retrieved from a vector index hard-filtered by that category, and an
//! answer is streamed token-by-token, constrained to the retrieved context,
//! with the grounding sources exposed for citation display.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod triage;
pub mod types;

pub use config::AssistantConfig;
pub use error::{Error, Result};
pub use generation::AnswerStream;
pub use pipeline::Assistant;
pub use types::{Category, Chunk, PipelineResult, ScoredMatch, SourceRef};
