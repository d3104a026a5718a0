//! Generative model provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::generation::AnswerStream;

/// Trait for generative model calls
///
/// Implementations:
/// - `OllamaLlm`: local Ollama server (llama3.2, gemma3, etc.)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a complete response for a prompt (non-streaming).
    /// The triage classifier uses this for its single routing call.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Generate a streamed response under a system instruction.
    /// The returned stream is single-consumer and cancellable.
    async fn stream_complete(&self, system: &str, prompt: &str) -> Result<AnswerStream>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// The model being used
    fn model(&self) -> &str;
}
