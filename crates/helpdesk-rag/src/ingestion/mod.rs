//! Knowledge base ingestion
//!
//! Walks a data directory and loads each readable text file as one chunk.
//! The file's parent directory name is its category tag (e.g.
//! `data/networking/vpn.md` is tagged `networking`); directories that are
//! not a known label fall back to `general`. Chunking strategy is out of
//! scope here, so one file maps to one chunk.

use std::path::Path;
use std::sync::Arc;

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, VectorStoreProvider};
use crate::types::{Category, Chunk};

/// Summary of one ingestion run
#[derive(Debug, Default, Clone)]
pub struct IngestReport {
    /// Files embedded and inserted
    pub files_ingested: usize,
    /// Files skipped (unreadable or empty)
    pub files_skipped: usize,
}

/// Directory-tree ingestor
pub struct DirectoryIngestor {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
}

impl DirectoryIngestor {
    /// Create a new ingestor
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStoreProvider>) -> Self {
        Self { embedder, store }
    }

    /// Ingest every text file under `root`, recursively
    pub async fn ingest_dir(&self, root: &Path) -> Result<IngestReport> {
        if !root.is_dir() {
            return Err(Error::Ingestion(format!(
                "Not a directory: {}",
                root.display()
            )));
        }

        let mut report = IngestReport::default();

        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();

            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "skipping unreadable file: {}", e);
                    report.files_skipped += 1;
                    continue;
                }
            };
            if content.trim().is_empty() {
                tracing::debug!(path = %path.display(), "skipping empty file");
                report.files_skipped += 1;
                continue;
            }

            let category = category_for(path);
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "unknown".to_string());

            let embedding = self.embedder.embed(&content).await?;
            let chunk =
                Chunk::new(content, file_name.as_str(), category).with_embedding(embedding);
            self.store.insert_chunk(&chunk).await?;

            tracing::info!(file = %file_name, %category, "ingested");
            report.files_ingested += 1;
        }

        tracing::info!(
            ingested = report.files_ingested,
            skipped = report.files_skipped,
            "ingestion complete"
        );

        Ok(report)
    }
}

/// Category tag for a file: its parent directory name, or `general` when the
/// directory is not one of the known labels
fn category_for(path: &Path) -> Category {
    path.parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or(Category::General)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::providers::LocalVectorStore;

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        fn dimensions(&self) -> usize {
            2
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn category_comes_from_parent_directory() {
        assert_eq!(
            category_for(Path::new("data/networking/vpn.md")),
            Category::Networking
        );
        assert_eq!(
            category_for(Path::new("data/security/mfa.md")),
            Category::Security
        );
        assert_eq!(
            category_for(Path::new("data/misc/notes.md")),
            Category::General
        );
    }

    #[tokio::test]
    async fn ingests_files_with_directory_categories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("networking")).unwrap();
        std::fs::create_dir_all(dir.path().join("hardware")).unwrap();
        std::fs::write(
            dir.path().join("networking/wifi.md"),
            "Restart the router.",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("hardware/printer.md"),
            "Reseat the paper tray.",
        )
        .unwrap();
        std::fs::write(dir.path().join("hardware/empty.md"), "").unwrap();

        let store = Arc::new(LocalVectorStore::in_memory(2));
        let dyn_store: Arc<dyn VectorStoreProvider> = store.clone();
        let ingestor = DirectoryIngestor::new(Arc::new(FixedEmbedder), dyn_store);

        let report = ingestor.ingest_dir(dir.path()).await.unwrap();
        assert_eq!(report.files_ingested, 2);
        assert_eq!(report.files_skipped, 1);

        let matches = store
            .search(&[1.0, 0.0], Category::Networking, 10)
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].chunk.file_name, "wifi.md");
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let store: Arc<dyn VectorStoreProvider> = Arc::new(LocalVectorStore::in_memory(2));
        let ingestor = DirectoryIngestor::new(Arc::new(FixedEmbedder), store);
        let result = ingestor.ingest_dir(Path::new("/nonexistent/data")).await;
        assert!(result.is_err());
    }
}
