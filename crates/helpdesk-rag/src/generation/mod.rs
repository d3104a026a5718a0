//! Grounded answer generation

pub mod ollama;
pub mod prompt;
pub mod stream;

pub use ollama::OllamaClient;
pub use prompt::PromptBuilder;
pub use stream::AnswerStream;

use std::sync::Arc;

use crate::config::PromptConfig;
use crate::error::{Error, Result};
use crate::providers::LlmProvider;
use crate::types::{Category, ScoredMatch};

/// Grounded answer synthesizer
///
/// Streams a generated answer whose knowledge is instructed to come only
/// from the supplied matches. The grounding is a soft constraint enforced by
/// the model's system instruction; the synthesizer does not post-validate
/// the generated text against the retrieved content. With an empty match
/// list the model is still invoked and is expected to produce the configured
/// refusal phrase.
pub struct Synthesizer {
    llm: Arc<dyn LlmProvider>,
    prompts: PromptConfig,
}

impl Synthesizer {
    /// Create a new synthesizer
    pub fn new(llm: Arc<dyn LlmProvider>, prompts: PromptConfig) -> Self {
        Self { llm, prompts }
    }

    /// Stream an answer for the query, grounded in the given matches.
    /// The matches themselves are left untouched for citation display.
    pub async fn synthesize(
        &self,
        query: &str,
        category: Category,
        matches: &[ScoredMatch],
    ) -> Result<AnswerStream> {
        let system = PromptBuilder::system_prompt(&self.prompts, category);
        let prompt = PromptBuilder::answer_prompt(query, matches);

        tracing::debug!(
            %category,
            sources = matches.len(),
            model = self.llm.model(),
            "synthesizing answer"
        );

        self.llm
            .stream_complete(&system, &prompt)
            .await
            .map_err(|e| Error::synthesis(&e))
    }
}
