//! Pipeline result and citation types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;
use super::chunk::ScoredMatch;
use crate::generation::AnswerStream;

/// Citation reference for one retrieved source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    /// Chunk ID
    pub chunk_id: Uuid,
    /// Source file name
    pub file_name: String,
    /// Category tag of the source chunk
    pub category: Category,
    /// Similarity score (0.0-1.0)
    pub score: f32,
}

impl SourceRef {
    /// Build a citation from a retrieval match
    pub fn from_match(m: &ScoredMatch) -> Self {
        Self {
            chunk_id: m.chunk.id,
            file_name: m.chunk.file_name.clone(),
            category: m.chunk.category,
            score: m.score,
        }
    }

    /// Format for display, e.g. `wifi_troubleshooting.md (score: 0.87)`
    pub fn format_inline(&self) -> String {
        format!("{} (score: {:.2})", self.file_name, self.score)
    }
}

/// Aggregate result of one pipeline invocation
///
/// Holds the live answer stream plus the ordered match list used as
/// grounding. The matches are exactly those returned by retrieval — no
/// reordering or filtering happens between retrieval and citation display.
#[derive(Debug)]
pub struct PipelineResult {
    /// Category the query was routed to
    pub category: Category,
    /// Retrieved matches, descending by score
    pub matches: Vec<ScoredMatch>,
    /// Streamed answer tokens (single-consumer, non-restartable)
    pub stream: AnswerStream,
}

impl PipelineResult {
    /// Citations for the grounding matches, in retrieval order
    pub fn sources(&self) -> Vec<SourceRef> {
        self.matches.iter().map(SourceRef::from_match).collect()
    }
}
