//! quizrank-text
//!
//! Text extraction (PDF and plain text) and corpus loading. Produces the
//! per-category [`quizrank_core::CorpusSnapshot`] the ranker reads.

pub mod extract;
pub mod loader;
pub mod normalize;

pub use extract::{extractor_for, PdfExtractor, PlainTextExtractor};
pub use loader::CorpusLoader;
