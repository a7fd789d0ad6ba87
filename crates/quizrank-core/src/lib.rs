#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! quizrank-core
//!
//! Keyword relevance ranking of document chunks, the per-category corpus
//! snapshot it runs against, and the collaborator traits around it
//! (extraction, chunking, question generation).

pub mod chunker;
pub mod config;
pub mod corpus;
pub mod error;
pub mod keywords;
pub mod quiz;
pub mod ranker;
pub mod traits;
pub mod types;

pub use corpus::{CorpusSnapshot, CorpusStore};
pub use ranker::{rank, rank_scored, ChunkRanker};
