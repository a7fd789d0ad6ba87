//! Per-category corpora as immutable snapshots.
//!
//! A [`CorpusSnapshot`] is built once and never mutated. [`CorpusStore`]
//! holds the current snapshot behind an `Arc`; a reload builds a fresh
//! snapshot and swaps the pointer, so a reader that already took a snapshot
//! keeps ranking against the complete old corpus.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::Result;
use crate::ranker::rank;
use crate::types::{Category, Chunk};

#[derive(Debug, Clone, Default)]
pub struct CorpusSnapshot {
    corpora: HashMap<Category, Vec<Chunk>>,
}

#[derive(Debug, Default)]
pub struct CorpusSnapshotBuilder {
    corpora: HashMap<Category, Vec<Chunk>>,
}

impl CorpusSnapshotBuilder {
    /// Set the corpus of `category`, replacing any earlier one.
    pub fn insert(mut self, category: impl Into<Category>, chunks: Vec<Chunk>) -> Self {
        self.corpora.insert(category.into(), chunks);
        self
    }

    /// Append `chunks` after whatever `category` already holds.
    pub fn extend(mut self, category: impl Into<Category>, chunks: Vec<Chunk>) -> Self {
        self.corpora.entry(category.into()).or_default().extend(chunks);
        self
    }

    pub fn build(self) -> CorpusSnapshot {
        CorpusSnapshot { corpora: self.corpora }
    }
}

impl CorpusSnapshot {
    pub fn builder() -> CorpusSnapshotBuilder { CorpusSnapshotBuilder::default() }

    /// Chunks of `category` in load order; empty for an unknown category.
    pub fn corpus(&self, category: &str) -> &[Chunk] {
        self.corpora.get(category).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, category: &str) -> bool { self.corpora.contains_key(category) }

    /// Known categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.corpora.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool { self.corpora.is_empty() }

    pub fn total_chunks(&self) -> usize { self.corpora.values().map(Vec::len).sum() }

    /// Rank the corpus of `category` against `query`.
    ///
    /// An unknown category yields an empty result. `top_k == 0` is still an
    /// invalid argument.
    pub fn relevant_chunks(&self, category: &str, query: &str, top_k: usize) -> Result<Vec<Chunk>> {
        match self.corpora.get(category) {
            Some(chunks) => rank(chunks, query, top_k),
            None => {
                debug!(category, "unknown category");
                rank::<Chunk>(&[], query, top_k)
            }
        }
    }
}

/// Shared handle to the current [`CorpusSnapshot`].
#[derive(Debug, Default)]
pub struct CorpusStore {
    current: RwLock<Arc<CorpusSnapshot>>,
}

impl CorpusStore {
    pub fn new(snapshot: CorpusSnapshot) -> Self {
        Self { current: RwLock::new(Arc::new(snapshot)) }
    }

    /// The snapshot in effect now. Later replacements do not affect it.
    pub fn snapshot(&self) -> Arc<CorpusSnapshot> {
        // The guarded value is a bare Arc; a poisoned lock still holds a whole one.
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*guard)
    }

    /// Install `snapshot` and return the one it replaced.
    pub fn replace(&self, snapshot: CorpusSnapshot) -> Arc<CorpusSnapshot> {
        let next = Arc::new(snapshot);
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, next)
    }

    pub fn relevant_chunks(&self, category: &str, query: &str, top_k: usize) -> Result<Vec<Chunk>> {
        self.snapshot().relevant_chunks(category, query, top_k)
    }
}
