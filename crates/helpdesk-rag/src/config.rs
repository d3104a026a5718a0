//! Configuration for the assistant
//!
//! Every component receives an explicit config record through its
//! constructor; there is no process-wide model state, so several pipeline
//! instances with different configurations can coexist in one process.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Top-level assistant configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Embedding configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    /// Vector store configuration
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Answer prompt configuration
    #[serde(default)]
    pub prompts: PromptConfig,
}

impl AssistantConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse config: {}", e)))
    }

    /// Load from a file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds, applied to every model call
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "llama3.2:3b".to_string(),
            temperature: 0.1, // low temperature keeps routing and answers factual
            timeout_secs: 600,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding dimensions (768 for nomic-embed-text)
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { dimensions: 768 }
    }
}

/// Vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Path to the persisted index file
    pub storage_path: PathBuf,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        let storage_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("helpdesk-rag")
            .join("knowledge_base.json");
        Self { storage_path }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// Answer prompt configuration
///
/// The system instruction is rendered from these records rather than built
/// ad hoc, so the instruction text stays data-driven and testable without a
/// model call. `role_description` may contain a `{category}` placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Role line scoping the assistant to the routed category
    pub role_description: String,
    /// Fixed phrase the model must emit when the context lacks the answer
    pub refusal_phrase: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            role_description: "You are a technician for the {category} department.".to_string(),
            refusal_phrase: "I do not have documentation for this in the knowledge base."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let config = AssistantConfig::default();
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.llm.embed_model, "nomic-embed-text");
        assert_eq!(config.embeddings.dimensions, 768);
        assert!(config.prompts.role_description.contains("{category}"));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = AssistantConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: AssistantConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.llm.base_url, config.llm.base_url);
        assert_eq!(parsed.retrieval.top_k, config.retrieval.top_k);
        assert_eq!(parsed.prompts.refusal_phrase, config.prompts.refusal_phrase);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: AssistantConfig = toml::from_str(
            r#"
            [llm]
            base_url = "http://ollama:11434"
            embed_model = "nomic-embed-text"
            generate_model = "gemma3:1b"
            temperature = 0.2
            timeout_secs = 120
            "#,
        )
        .unwrap();
        assert_eq!(parsed.llm.generate_model, "gemma3:1b");
        assert_eq!(parsed.retrieval.top_k, 3);
    }
}
