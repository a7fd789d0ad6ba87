//! Domain types shared by the ranker, the loaders and the collaborators.

use serde::{Deserialize, Serialize};

/// A contiguous span of document text; the atomic unit of retrieval.
pub type Chunk = String;

/// Label grouping one corpus, e.g. "aptitude" or "interview".
pub type Category = String;

/// A ranked chunk together with the signal that placed it.
///
/// `index` is the chunk's position in the input corpus. `score` is the
/// coverage-weighted keyword score, or `None` when the chunk was chosen by
/// even sampling rather than relevance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedChunk {
    pub index: usize,
    pub score: Option<f64>,
    pub text: Chunk,
}

/// How a ranking result was produced.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    Relevance,
    EvenSampling,
}

/// One multiple-choice question as returned by a question generator.
///
/// `correct_answer` indexes into `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
}

/// Output of a ranking call: the selected chunks in result order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub selection: Selection,
    pub chunks: Vec<RankedChunk>,
}

impl Ranking {
    pub fn into_texts(self) -> Vec<Chunk> {
        self.chunks.into_iter().map(|c| c.text).collect()
    }
}
