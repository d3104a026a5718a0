//! Vector store provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Category, Chunk, ScoredMatch};

/// Trait for vector storage and category-filtered similarity search
///
/// The pipeline core treats the store as read-only; writes happen only
/// through the ingestion path.
///
/// Implementations:
/// - `LocalVectorStore`: in-process cosine index persisted to disk
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Insert a chunk with its embedding
    async fn insert_chunk(&self, chunk: &Chunk) -> Result<()>;

    /// Insert multiple chunks
    async fn insert_chunks(&self, chunks: &[Chunk]) -> Result<()> {
        for chunk in chunks {
            self.insert_chunk(chunk).await?;
        }
        Ok(())
    }

    /// Search for the most similar chunks within one category
    ///
    /// The category filter is exact-match and applied before ranking: chunks
    /// tagged with any other category are invisible to the query regardless
    /// of their similarity. Returns up to `top_k` matches in non-increasing
    /// score order; an empty result is not an error.
    async fn search(
        &self,
        query_embedding: &[f32],
        category: Category,
        top_k: usize,
    ) -> Result<Vec<ScoredMatch>>;

    /// Total number of chunks stored
    async fn len(&self) -> Result<usize>;

    /// Check if the store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
