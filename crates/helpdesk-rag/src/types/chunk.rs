//! Document chunks and retrieval matches

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;

/// A unit of ingested knowledge base content
///
/// Chunks are immutable after ingestion and owned by the vector store. The
/// category tag is assigned at ingestion time (from the source directory
/// layout) and drives the exact-match retrieval filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk ID
    pub id: Uuid,
    /// Raw text content
    pub content: String,
    /// Embedding vector (empty until computed)
    #[serde(default)]
    pub embedding: Vec<f32>,
    /// Source file name, surfaced in citations
    pub file_name: String,
    /// Triage category tag
    pub category: Category,
    /// Ingestion timestamp
    pub ingested_at: DateTime<Utc>,
}

impl Chunk {
    /// Create a new chunk with a fresh ID and the current timestamp
    pub fn new(
        content: impl Into<String>,
        file_name: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            embedding: Vec::new(),
            file_name: file_name.into(),
            category,
            ingested_at: Utc::now(),
        }
    }

    /// Attach an embedding vector
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }
}

/// A retrieved chunk with its similarity score
///
/// Transient, scoped to one query. Retrieval returns these in non-increasing
/// score order and the same instances flow through to citation display.
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Similarity score (0.0-1.0, higher is better)
    pub score: f32,
}
