use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::traits::Chunker;
use crate::types::Chunk;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub max_chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_chunk_size: 1000, overlap: 200 }
    }
}

/// Paragraph-aware chunker.
///
/// Text is split on blank or whitespace-only lines; each paragraph has its whitespace collapsed.
/// A paragraph longer than `max_chunk_size` characters is word-wrapped into
/// pieces of at most `max_chunk_size - overlap` characters.
#[derive(Debug, Clone, Default)]
pub struct ParagraphChunker {
    config: ChunkingConfig,
}

impl ParagraphChunker {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        if config.max_chunk_size <= config.overlap {
            return Err(Error::InvalidConfig(format!(
                "max_chunk_size ({}) must exceed overlap ({})",
                config.max_chunk_size, config.overlap
            )));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig { &self.config }

    fn wrap_width(&self) -> usize { self.config.max_chunk_size - self.config.overlap }

    pub fn chunk_text(&self, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for paragraph in paragraphs(text) {
            if paragraph.chars().count() > self.config.max_chunk_size {
                chunks.extend(wrap_words(&paragraph, self.wrap_width()));
            } else {
                chunks.push(paragraph);
            }
        }
        chunks.into_iter().map(|c| c.trim().to_string()).filter(|c| !c.is_empty()).collect()
    }
}

/// Whitespace-collapsed paragraphs of `text`. Any whitespace-only line
/// (including `\r\n` blank lines) ends a paragraph.
fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut words: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !words.is_empty() {
                out.push(words.join(" "));
                words.clear();
            }
            continue;
        }
        words.extend(line.split_whitespace());
    }
    if !words.is_empty() { out.push(words.join(" ")); }
    out
}

impl Chunker for ParagraphChunker {
    fn chunk(&self, text: &str) -> Vec<Chunk> { self.chunk_text(text) }
}

/// Greedy word wrap of whitespace-collapsed `text` to lines of at most
/// `width` characters. Words longer than `width` are split.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    for word in text.split(' ') {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
            continue;
        }
        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if word_len <= width {
            current.push_str(word);
            current_len = word_len;
        } else {
            let chars: Vec<char> = word.chars().collect();
            let mut pieces = chars.chunks(width).map(|p| p.iter().collect::<String>()).peekable();
            while let Some(piece) = pieces.next() {
                if pieces.peek().is_some() {
                    lines.push(piece);
                } else {
                    current_len = piece.chars().count();
                    current = piece;
                }
            }
        }
    }
    if current_len > 0 { lines.push(current); }
    lines
}
