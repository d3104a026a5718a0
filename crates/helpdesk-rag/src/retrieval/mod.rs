//! Category-filtered retrieval

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::providers::{EmbeddingProvider, VectorStoreProvider};
use crate::types::{Category, ScoredMatch};

/// Filtered retriever: embed the query, search one category
///
/// The category filter is a hard filter, not a re-ranking boost. If triage
/// mis-routes a query, answers living under another category are unreachable
/// for that call; that is an accepted consequence of the filtering design.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    top_k: usize,
}

impl Retriever {
    /// Create a new retriever
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            top_k: config.top_k,
        }
    }

    /// Retrieve up to the configured `top_k` matches for a query
    pub async fn retrieve(&self, query: &str, category: Category) -> Result<Vec<ScoredMatch>> {
        self.retrieve_k(query, category, self.top_k).await
    }

    /// Retrieve up to `k` matches for a query within one category,
    /// in non-increasing score order. An empty result is not an error.
    pub async fn retrieve_k(
        &self,
        query: &str,
        category: Category,
        k: usize,
    ) -> Result<Vec<ScoredMatch>> {
        let query_embedding = self.embedder.embed(query).await?;
        let matches = self.store.search(&query_embedding, category, k).await?;

        debug_assert!(matches.iter().all(|m| m.chunk.category == category));
        debug_assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));

        tracing::debug!(%category, matches = matches.len(), k, "retrieval complete");

        Ok(matches)
    }
}
