use std::path::Path;

use crate::types::{Chunk, QuestionRecord};

/// Supplies the raw text of one source document.
///
/// Implementations skip unreadable pages rather than fail the document, and
/// return ASCII text with page breaks collapsed to single newlines.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> anyhow::Result<String>;
}

/// Splits extracted text into an ordered corpus.
pub trait Chunker: Send + Sync {
    fn chunk(&self, text: &str) -> Vec<Chunk>;
}

/// Turns ranked context into multiple-choice questions.
pub trait QuestionGenerator: Send + Sync {
    fn generate(&self, context: &str, num_questions: usize) -> anyhow::Result<Vec<QuestionRecord>>;
}
