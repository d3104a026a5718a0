//! Core types for the assistant

pub mod category;
pub mod chunk;
pub mod response;

pub use category::Category;
pub use chunk::{Chunk, ScoredMatch};
pub use response::{PipelineResult, SourceRef};
