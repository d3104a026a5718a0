//! Prompt templates for triage routing and grounded answers

use crate::config::PromptConfig;
use crate::types::{Category, ScoredMatch};

/// Prompt builder for the assistant
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render the grounded-answer system instruction for a category
    ///
    /// The instruction scopes the assistant's role to the routed category,
    /// restricts its knowledge to the supplied context, and mandates the
    /// configured refusal phrase when the context lacks the answer. The
    /// model enforces these rules; the pipeline does not post-validate the
    /// generated text against the retrieved content.
    pub fn system_prompt(config: &PromptConfig, category: Category) -> String {
        let role = config
            .role_description
            .replace("{category}", category.as_str());

        format!(
            "{role} \
             Use ONLY the provided context. If the answer is not there, \
             say: '{refusal}' \
             DO NOT give general advice.",
            role = role,
            refusal = config.refusal_phrase,
        )
    }

    /// Build the context block from retrieved matches, one numbered section
    /// per source in retrieval order
    pub fn build_context(matches: &[ScoredMatch]) -> String {
        let mut context = String::new();

        for (i, m) in matches.iter().enumerate() {
            context.push_str(&format!(
                "[{}] {}\n\nContent:\n{}\n\n---\n\n",
                i + 1,
                m.chunk.file_name,
                m.chunk.content
            ));
        }

        context
    }

    /// Build the user-facing generation prompt: context block plus question
    pub fn answer_prompt(question: &str, matches: &[ScoredMatch]) -> String {
        format!(
            "CONTEXT FROM KNOWLEDGE BASE:\n{context}\nQUESTION: {question}\n\nAnswer:",
            context = Self::build_context(matches),
            question = question,
        )
    }

    /// Build the triage router prompt for a query
    ///
    /// Keyword rules mirror the reference routing behavior; the model is
    /// asked for a single category word and its raw output is resolved by
    /// [`crate::triage::route_label`].
    pub fn router_prompt(query: &str) -> String {
        format!(
            "SYSTEM: You are a strict router. Categorize the user's issue.\n\
             - If it mentions WiFi, Internet, IP, DNS, DHCP, Connection -> networking\n\
             - If it mentions Printer, Monitor, Screen, Laptop, Hardware -> hardware\n\
             - If it mentions Password, Phishing, Login, Access, MFA -> security\n\
             - Otherwise -> general\n\n\
             Question: {query}\n\
             Output only the single word:",
            query = query,
        )
    }
}
