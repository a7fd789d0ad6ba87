//! Keyword relevance ranking over an ordered corpus of chunks.
//!
//! Each chunk is scored against the query keywords:
//! - 2 points per (non-overlapping) occurrence of a keyword
//! - +3 when the chunk text starts with the keyword
//! - +2 when the keyword occurs before the first `.`
//!
//! The summed score is then scaled by `1 + coverage`, where coverage is the
//! fraction of keywords that occurred at least once. Chunks with no
//! occurrence are dropped. Results are ordered by score descending, ties by
//! ascending corpus index. When the query has no keywords or nothing matches,
//! chunks are sampled evenly by position instead.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{Error, Result};
use crate::keywords::extract_keywords;
use crate::types::{Chunk, RankedChunk, Ranking, Selection};

const OCCURRENCE_POINTS: f64 = 2.0;
const PREFIX_BONUS: f64 = 3.0;
const FIRST_SENTENCE_BONUS: f64 = 2.0;

/// Stateless ranker. Methods delegate to [`rank`] and [`rank_scored`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ChunkRanker;

impl ChunkRanker {
    pub fn new() -> Self { Self }

    pub fn rank<S: AsRef<str>>(&self, corpus: &[S], query: &str, top_k: usize) -> Result<Vec<Chunk>> {
        rank(corpus, query, top_k)
    }

    pub fn rank_scored<S: AsRef<str>>(&self, corpus: &[S], query: &str, top_k: usize) -> Result<Ranking> {
        rank_scored(corpus, query, top_k)
    }
}

/// Return up to `top_k` chunks of `corpus` most relevant to `query`.
///
/// Fails only when `top_k` is zero.
pub fn rank<S: AsRef<str>>(corpus: &[S], query: &str, top_k: usize) -> Result<Vec<Chunk>> {
    Ok(rank_scored(corpus, query, top_k)?.into_texts())
}

/// Same selection as [`rank`], keeping each chunk's index and score.
pub fn rank_scored<S: AsRef<str>>(corpus: &[S], query: &str, top_k: usize) -> Result<Ranking> {
    if top_k < 1 {
        return Err(Error::InvalidArgument(format!("top_k must be at least 1, got {top_k}")));
    }

    let keywords = extract_keywords(query);
    if keywords.is_empty() {
        debug!(query, corpus_len = corpus.len(), "no keywords in query, sampling evenly");
        return Ok(even_sample(corpus, top_k));
    }

    let mut scored: Vec<(f64, usize)> = corpus
        .iter()
        .enumerate()
        .filter_map(|(i, chunk)| {
            let score = score_chunk(chunk.as_ref(), &keywords);
            (score > 0.0).then_some((score, i))
        })
        .collect();

    if scored.is_empty() {
        debug!(?keywords, corpus_len = corpus.len(), "no chunk matched, sampling evenly");
        return Ok(even_sample(corpus, top_k));
    }

    // Lowest index wins ties.
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    debug!(?keywords, candidates = scored.len(), top_k, "ranked by relevance");
    scored.truncate(top_k);

    let chunks = scored
        .into_iter()
        .map(|(score, index)| RankedChunk { index, score: Some(score), text: corpus[index].as_ref().to_string() })
        .collect();
    Ok(Ranking { selection: Selection::Relevance, chunks })
}

/// Coverage-weighted keyword score of one chunk. Zero means no keyword occurs.
pub fn score_chunk(chunk: &str, keywords: &[String]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }
    let lower = chunk.to_lowercase();
    let first_sentence = lower.split('.').next().unwrap_or_default();

    let mut score = 0.0;
    let mut matched: HashSet<&str> = HashSet::new();
    for keyword in keywords {
        let occurrences = lower.matches(keyword.as_str()).count();
        if occurrences == 0 {
            continue;
        }
        matched.insert(keyword.as_str());
        score += occurrences as f64 * OCCURRENCE_POINTS;
        if lower.starts_with(keyword.as_str()) {
            score += PREFIX_BONUS;
        }
        if first_sentence.contains(keyword.as_str()) {
            score += FIRST_SENTENCE_BONUS;
        }
    }

    let coverage = matched.len() as f64 / keywords.len() as f64;
    score * (1.0 + coverage)
}

/// Indices chosen by positional sampling: everything when the corpus fits,
/// otherwise every `len / top_k`-th index capped at `top_k`.
pub fn even_sample_indices(len: usize, top_k: usize) -> Vec<usize> {
    if len <= top_k {
        return (0..len).collect();
    }
    let step = len / top_k;
    (0..len).step_by(step).take(top_k).collect()
}

fn even_sample<S: AsRef<str>>(corpus: &[S], top_k: usize) -> Ranking {
    let chunks = even_sample_indices(corpus.len(), top_k)
        .into_iter()
        .map(|index| RankedChunk { index, score: None, text: corpus[index].as_ref().to_string() })
        .collect();
    Ranking { selection: Selection::EvenSampling, chunks }
}
