//! Glue between ranking and question generation for one "generate" action.

use anyhow::{bail, Context};
use tracing::info;

use crate::corpus::CorpusSnapshot;
use crate::traits::QuestionGenerator;
use crate::types::{Chunk, QuestionRecord};

pub const DEFAULT_QUERY: &str = "Generate questions about core concepts and important topics";
const SIMILAR_PREFIX: &str = "Generate questions similar to: ";
const RECENT_QUESTION_WINDOW: usize = 3;

/// Query for the next round: the default prompt on the first round,
/// otherwise the last three asked questions.
pub fn synthesize_query<S: AsRef<str>>(recent_questions: &[S]) -> String {
    if recent_questions.is_empty() {
        return DEFAULT_QUERY.to_string();
    }
    let start = recent_questions.len().saturating_sub(RECENT_QUESTION_WINDOW);
    let tail: Vec<&str> = recent_questions[start..].iter().map(|q| q.as_ref()).collect();
    format!("{SIMILAR_PREFIX}{}", tail.join(" "))
}

/// Context handed to the question generator.
pub fn build_context(chunks: &[Chunk]) -> String { chunks.join(" ") }

/// Rank `category` for `query` and ask `generator` for `num_questions`
/// questions over the result.
///
/// Extra questions are dropped; too few is an error, as is a category with
/// no content.
pub fn generate_round(
    snapshot: &CorpusSnapshot,
    category: &str,
    query: &str,
    top_k: usize,
    generator: &dyn QuestionGenerator,
    num_questions: usize,
) -> anyhow::Result<Vec<QuestionRecord>> {
    let chunks = snapshot.relevant_chunks(category, query, top_k)?;
    if chunks.is_empty() {
        bail!("No content found for category: {category}");
    }
    let context = build_context(&chunks);
    info!(category, chunks = chunks.len(), context_len = context.len(), "generating questions");

    let mut questions = generator
        .generate(&context, num_questions)
        .with_context(|| format!("question generation failed for category '{category}'"))?;
    if questions.len() < num_questions {
        bail!("Not enough questions generated. Expected {num_questions}, got {}", questions.len());
    }
    questions.truncate(num_questions);
    Ok(questions)
}
