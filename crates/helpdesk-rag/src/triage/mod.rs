//! Triage classification: route a query to a category
//!
//! The routing decision is a single constrained generative call whose raw
//! output is resolved by a priority-ordered substring scan. The scan is
//! deliberately simple text matching; it lives behind [`TriageClassifier`]
//! so it can later be swapped for a structured-output classifier without
//! changing callers.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::LlmProvider;
use crate::types::Category;

/// Resolve the router model's raw output to a category
///
/// Lowercases and trims the output, then checks the routed labels as
/// substrings in fixed priority order (networking, hardware, security); the
/// first match wins. Verbose or malformed output that names no label
/// degrades to `General` rather than failing.
pub fn route_label(raw: &str) -> Category {
    let normalized = raw.trim().to_lowercase();
    for category in Category::ROUTED {
        if normalized.contains(category.as_str()) {
            return category;
        }
    }
    Category::General
}

/// Category classifier backed by a generative model
pub struct TriageClassifier {
    llm: Arc<dyn LlmProvider>,
}

impl TriageClassifier {
    /// Create a new classifier
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Classify a query into exactly one category
    ///
    /// Issues exactly one model call, no retries. A failed call is fatal for
    /// the pipeline invocation (no fallback category is substituted); only
    /// the no-keyword-match case defaults to `General`.
    pub async fn classify(&self, query: &str) -> Result<Category> {
        let prompt = PromptBuilder::router_prompt(query);

        let raw = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| Error::classification(&e))?;

        let category = route_label(&raw);
        tracing::debug!(%category, raw = %raw.trim(), "query routed");

        Ok(category)
    }
}
