//! Local vector store: in-process cosine index persisted as JSON
//!
//! Good for knowledge bases of a few thousand chunks. Ranking is an exact
//! scan over the category's chunks, so the hard category filter is applied
//! before any scoring.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::VectorStoreConfig;
use crate::error::{Error, Result};
use crate::types::{Category, Chunk, ScoredMatch};

use super::vector_store::VectorStoreProvider;

/// Local vector store backed by a JSON file
pub struct LocalVectorStore {
    chunks: Arc<RwLock<Vec<Chunk>>>,
    storage_path: PathBuf,
    dimensions: usize,
}

impl LocalVectorStore {
    /// Open the store, loading any previously persisted chunks
    pub fn open(config: &VectorStoreConfig, dimensions: usize) -> Result<Self> {
        let chunks = if config.storage_path.exists() {
            load_chunks(&config.storage_path)?
        } else {
            Vec::new()
        };

        tracing::debug!(
            path = %config.storage_path.display(),
            chunks = chunks.len(),
            "opened local vector store"
        );

        Ok(Self {
            chunks: Arc::new(RwLock::new(chunks)),
            storage_path: config.storage_path.clone(),
            dimensions,
        })
    }

    /// In-memory store with no persistence path (tests)
    #[cfg(test)]
    pub fn in_memory(dimensions: usize) -> Self {
        Self {
            chunks: Arc::new(RwLock::new(Vec::new())),
            storage_path: PathBuf::new(),
            dimensions,
        }
    }

    fn persist(&self) -> Result<()> {
        if self.storage_path.as_os_str().is_empty() {
            return Ok(());
        }
        let chunks = self.chunks.read();
        persist_chunks(&self.storage_path, &chunks)
    }
}

fn load_chunks(path: &Path) -> Result<Vec<Chunk>> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::vector_store(format!("Corrupt index file: {}", e)))
}

fn persist_chunks(path: &Path, chunks: &[Chunk]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = serde_json::to_string(chunks)?;
    std::fs::write(path, serialized)?;
    Ok(())
}

/// Cosine similarity of two equal-length vectors, mapped to 0.0 for
/// degenerate (zero-norm) inputs
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// Rank chunks for a query within one category
///
/// Chunks tagged with any other category are excluded before scoring, so
/// they cannot appear in the result however similar they are.
fn rank(
    chunks: &[Chunk],
    query_embedding: &[f32],
    category: Category,
    top_k: usize,
) -> Vec<ScoredMatch> {
    let mut matches: Vec<ScoredMatch> = chunks
        .iter()
        .filter(|c| c.category == category)
        .filter(|c| c.embedding.len() == query_embedding.len())
        .map(|c| ScoredMatch {
            chunk: c.clone(),
            score: cosine_similarity(&c.embedding, query_embedding),
        })
        .collect();

    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    matches.truncate(top_k);
    matches
}

#[async_trait]
impl VectorStoreProvider for LocalVectorStore {
    async fn insert_chunk(&self, chunk: &Chunk) -> Result<()> {
        if chunk.embedding.is_empty() {
            return Err(Error::vector_store("Chunk has no embedding"));
        }
        if chunk.embedding.len() != self.dimensions {
            return Err(Error::vector_store(format!(
                "Embedding has {} dimensions, store expects {}",
                chunk.embedding.len(),
                self.dimensions
            )));
        }

        self.chunks.write().push(chunk.clone());
        self.persist()
    }

    async fn insert_chunks(&self, chunks: &[Chunk]) -> Result<()> {
        for chunk in chunks {
            if chunk.embedding.len() != self.dimensions {
                return Err(Error::vector_store(format!(
                    "Embedding has {} dimensions, store expects {}",
                    chunk.embedding.len(),
                    self.dimensions
                )));
            }
        }
        self.chunks.write().extend(chunks.iter().cloned());
        self.persist()
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        category: Category,
        top_k: usize,
    ) -> Result<Vec<ScoredMatch>> {
        let chunks = self.chunks.read();
        Ok(rank(&chunks, query_embedding, category, top_k))
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.chunks.read().len())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "local-json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(file_name: &str, category: Category, embedding: Vec<f32>) -> Chunk {
        Chunk::new("content", file_name, category).with_embedding(embedding)
    }

    #[test]
    fn cosine_handles_zero_vectors() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rank_never_crosses_categories() {
        let chunks = vec![
            chunk("net.md", Category::Networking, vec![1.0, 0.0]),
            // Identical embedding, wrong category: must stay invisible.
            chunk("sec.md", Category::Security, vec![1.0, 0.0]),
            chunk("net2.md", Category::Networking, vec![0.5, 0.5]),
        ];

        let matches = rank(&chunks, &[1.0, 0.0], Category::Networking, 10);
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.chunk.category == Category::Networking));
    }

    #[test]
    fn rank_orders_by_descending_score_and_truncates() {
        let chunks = vec![
            chunk("far.md", Category::General, vec![0.0, 1.0]),
            chunk("near.md", Category::General, vec![1.0, 0.0]),
            chunk("mid.md", Category::General, vec![0.7, 0.7]),
        ];

        let matches = rank(&chunks, &[1.0, 0.0], Category::General, 2);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].chunk.file_name, "near.md");
        assert!(matches[0].score >= matches[1].score);
    }

    #[test]
    fn rank_with_empty_category_is_empty_not_error() {
        let chunks = vec![chunk("hw.md", Category::Hardware, vec![1.0, 0.0])];
        let matches = rank(&chunks, &[1.0, 0.0], Category::Networking, 3);
        assert!(matches.is_empty());
    }

    #[test]
    fn rank_with_k_zero_is_empty() {
        let chunks = vec![chunk("hw.md", Category::Hardware, vec![1.0, 0.0])];
        assert!(rank(&chunks, &[1.0, 0.0], Category::Hardware, 0).is_empty());
    }

    #[test]
    fn insert_rejects_dimension_mismatch() {
        let store = LocalVectorStore::in_memory(3);
        let bad = chunk("bad.md", Category::General, vec![1.0, 0.0]);
        let result = tokio_test::block_on(store.insert_chunk(&bad));
        assert!(result.is_err());
    }

    #[test]
    fn store_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let config = VectorStoreConfig {
            storage_path: dir.path().join("kb.json"),
        };

        let store = LocalVectorStore::open(&config, 2).unwrap();
        tokio_test::block_on(
            store.insert_chunk(&chunk("vpn.md", Category::Networking, vec![1.0, 0.0])),
        )
        .unwrap();

        let reopened = LocalVectorStore::open(&config, 2).unwrap();
        assert_eq!(tokio_test::block_on(reopened.len()).unwrap(), 1);
        let matches =
            tokio_test::block_on(reopened.search(&[1.0, 0.0], Category::Networking, 3)).unwrap();
        assert_eq!(matches[0].chunk.file_name, "vpn.md");
    }
}
