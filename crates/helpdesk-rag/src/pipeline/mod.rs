//! Pipeline coordinator
//!
//! Sequences triage -> filtered retrieval -> grounded synthesis for one
//! query at a time. The stages run strictly in order with no branching
//! beyond the classifier's default-to-general fallback; a failure in any
//! stage aborts the whole invocation with no partial result. The category
//! produced by triage is the same value used for the retrieval filter and
//! the answer's system instruction — there is no re-classification
//! mid-pipeline.

use std::sync::Arc;

use crate::config::AssistantConfig;
use crate::error::Result;
use crate::generation::Synthesizer;
use crate::providers::{
    EmbeddingProvider, LlmProvider, LocalVectorStore, OllamaProvider, VectorStoreProvider,
};
use crate::retrieval::Retriever;
use crate::triage::TriageClassifier;
use crate::types::{Category, PipelineResult};

/// The assembled question-answering pipeline
pub struct Assistant {
    classifier: TriageClassifier,
    retriever: Retriever,
    synthesizer: Synthesizer,
}

impl Assistant {
    /// Assemble a pipeline from explicit providers
    pub fn new(
        config: &AssistantConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        store: Arc<dyn VectorStoreProvider>,
    ) -> Self {
        Self {
            classifier: TriageClassifier::new(Arc::clone(&llm)),
            retriever: Retriever::new(embedder, store, &config.retrieval),
            synthesizer: Synthesizer::new(llm, config.prompts.clone()),
        }
    }

    /// Assemble the default local stack: Ollama providers over a shared
    /// client plus the JSON-backed local vector store
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let (embedder, llm) = OllamaProvider::new(&config.llm, &config.embeddings)?.split();
        let store = LocalVectorStore::open(&config.vector_store, config.embeddings.dimensions)?;
        Ok(Self::new(
            config,
            Arc::new(embedder),
            Arc::new(llm),
            Arc::new(store),
        ))
    }

    /// Route a query to its category
    ///
    /// Exposed separately so callers can display the routed label before
    /// retrieval completes.
    pub async fn classify(&self, query: &str) -> Result<Category> {
        self.classifier.classify(query).await
    }

    /// Run the full pipeline for a query
    pub async fn answer(&self, query: &str) -> Result<PipelineResult> {
        let category = self.classifier.classify(query).await?;
        self.respond(query, category).await
    }

    /// Run retrieval and synthesis for a query under an already-routed
    /// category. The matches returned by retrieval are the exact matches
    /// surfaced for citation — no reordering or filtering in between.
    pub async fn respond(&self, query: &str, category: Category) -> Result<PipelineResult> {
        let matches = self.retriever.retrieve(query, category).await?;
        let stream = self.synthesizer.synthesize(query, category, &matches).await?;

        Ok(PipelineResult {
            category,
            matches,
            stream,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::error::Error;
    use crate::generation::AnswerStream;
    use crate::types::Chunk;

    /// Embedder that maps every text to a fixed unit vector
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

    /// Scripted model: one routing reply, one token script, and a recording
    /// of the last system instruction it was given
    struct ScriptedLlm {
        route_reply: Option<String>,
        tokens: Vec<String>,
        last_system: Mutex<Option<String>>,
    }

    impl ScriptedLlm {
        fn new(route_reply: &str, tokens: &[&str]) -> Self {
            Self {
                route_reply: Some(route_reply.to_string()),
                tokens: tokens.iter().map(|t| t.to_string()).collect(),
                last_system: Mutex::new(None),
            }
        }

        fn offline() -> Self {
            Self {
                route_reply: None,
                tokens: Vec::new(),
                last_system: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.route_reply
                .clone()
                .ok_or_else(|| Error::llm("model offline"))
        }

        async fn stream_complete(&self, system: &str, _prompt: &str) -> Result<AnswerStream> {
            *self.last_system.lock() = Some(system.to_string());
            Ok(AnswerStream::from_tokens(self.tokens.clone()))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-model"
        }
    }

    async fn seeded_store() -> Arc<LocalVectorStore> {
        let store = LocalVectorStore::in_memory(2);
        let chunks = vec![
            Chunk::new("Restart the router.", "wifi_fix.md", Category::Networking)
                .with_embedding(vec![1.0, 0.0]),
            Chunk::new("Reseat the paper tray.", "printer_jam.md", Category::Hardware)
                .with_embedding(vec![1.0, 0.0]),
            Chunk::new("Reset via the SSO portal.", "password_reset.md", Category::Security)
                .with_embedding(vec![1.0, 0.0]),
            Chunk::new("Check the VPN profile.", "vpn.md", Category::Networking)
                .with_embedding(vec![0.7, 0.7]),
        ];
        store.insert_chunks(&chunks).await.unwrap();
        Arc::new(store)
    }

    fn assistant(llm: Arc<ScriptedLlm>, store: Arc<LocalVectorStore>) -> Assistant {
        Assistant::new(
            &AssistantConfig::default(),
            Arc::new(FixedEmbedder),
            llm,
            store,
        )
    }

    #[tokio::test]
    async fn wifi_query_routes_to_networking_and_cites_networking_only() {
        let llm = Arc::new(ScriptedLlm::new("networking", &["Restart ", "the router."]));
        let assistant = assistant(Arc::clone(&llm), seeded_store().await);

        let result = assistant.answer("My wifi keeps disconnecting").await.unwrap();
        assert_eq!(result.category, Category::Networking);
        assert!(!result.matches.is_empty());
        assert!(result
            .matches
            .iter()
            .all(|m| m.chunk.category == Category::Networking));

        // Sources mirror the matches exactly: same order, same chunks.
        let sources = result.sources();
        assert_eq!(sources.len(), result.matches.len());
        for (source, m) in sources.iter().zip(result.matches.iter()) {
            assert_eq!(source.chunk_id, m.chunk.id);
            assert_eq!(source.score, m.score);
        }

        let answer = result.stream.collect().await.unwrap();
        assert_eq!(answer, "Restart the router.");
    }

    #[tokio::test]
    async fn password_query_routes_to_security() {
        let llm = Arc::new(ScriptedLlm::new("security", &["Use the SSO portal."]));
        let assistant = assistant(llm, seeded_store().await);

        let result = assistant.answer("I forgot my password").await.unwrap();
        assert_eq!(result.category, Category::Security);
        assert!(result
            .matches
            .iter()
            .all(|m| m.chunk.category == Category::Security));
    }

    #[tokio::test]
    async fn printer_query_routes_to_hardware() {
        let llm = Arc::new(ScriptedLlm::new("hardware", &["Reseat the tray."]));
        let assistant = assistant(llm, seeded_store().await);

        let result = assistant.answer("The printer is jammed").await.unwrap();
        assert_eq!(result.category, Category::Hardware);
    }

    #[tokio::test]
    async fn unmatched_query_defaults_to_general_with_refusal_stream() {
        let refusal = AssistantConfig::default().prompts.refusal_phrase;
        let llm = Arc::new(ScriptedLlm::new("I don't know", &[refusal.as_str()]));
        let assistant = assistant(Arc::clone(&llm), seeded_store().await);

        let result = assistant.answer("What's the weather today").await.unwrap();
        assert_eq!(result.category, Category::General);
        // No general-tagged chunks exist: matches are empty, yet the
        // synthesizer still ran and produced a non-empty stream.
        assert!(result.matches.is_empty());
        assert!(result.sources().is_empty());
        let answer = result.stream.collect().await.unwrap();
        assert_eq!(answer, refusal);
    }

    #[tokio::test]
    async fn system_instruction_is_scoped_to_the_routed_category() {
        let llm = Arc::new(ScriptedLlm::new("networking", &["ok"]));
        let assistant = assistant(Arc::clone(&llm), seeded_store().await);

        let _ = assistant.answer("wifi down").await.unwrap();

        let system = llm.last_system.lock().clone().unwrap();
        assert!(system.contains("networking department"));
        assert!(system.contains("I do not have documentation"));
    }

    #[tokio::test]
    async fn respond_uses_the_supplied_category_without_reclassifying() {
        // Router would say networking, but the caller pins hardware.
        let llm = Arc::new(ScriptedLlm::new("networking", &["ok"]));
        let assistant = assistant(Arc::clone(&llm), seeded_store().await);

        let result = assistant
            .respond("wifi down", Category::Hardware)
            .await
            .unwrap();
        assert_eq!(result.category, Category::Hardware);
        assert!(result
            .matches
            .iter()
            .all(|m| m.chunk.category == Category::Hardware));
        let system = llm.last_system.lock().clone().unwrap();
        assert!(system.contains("hardware department"));
    }

    #[tokio::test]
    async fn classification_call_failure_is_fatal() {
        let llm = Arc::new(ScriptedLlm::offline());
        let assistant = assistant(llm, seeded_store().await);

        let err = assistant.answer("anything").await.unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }
}
