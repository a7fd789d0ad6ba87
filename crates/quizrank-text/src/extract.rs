use anyhow::{anyhow, Context, Result};
use pdf_oxide::PdfDocument;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use quizrank_core::traits::TextExtractor;

use crate::normalize::{normalize_page, strip_non_ascii};

/// Page-by-page PDF text extraction. Unreadable pages are skipped; each kept
/// page is normalized onto a single line.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
	fn extract(&self, path: &Path) -> Result<String> {
		let mut doc = PdfDocument::open(path).map_err(|e| anyhow!("failed to parse PDF {}: {e}", path.display()))?;
		let page_count = doc.page_count().map_err(|e| anyhow!("failed to read page count of {}: {e}", path.display()))?;
		let mut text = String::new();
		let mut skipped = 0usize;
		for page_index in 0..page_count {
			match doc.extract_text(page_index) {
				Ok(page) => { text.push_str(&normalize_page(&page)); text.push('\n'); }
				Err(e) => { skipped += 1; warn!(path = %path.display(), page = page_index + 1, error = %e, "skipping unreadable page"); }
			}
		}
		debug!(path = %path.display(), pages = page_count, skipped, "extracted PDF text");
		Ok(text)
	}
}

/// Plain text files. Invalid UTF-8 is decoded lossily; line structure is kept
/// so blank-line paragraph breaks survive.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
	fn extract(&self, path: &Path) -> Result<String> {
		let content = match fs::read_to_string(path) {
			Ok(content) => content,
			Err(_) => String::from_utf8_lossy(&fs::read(path).with_context(|| format!("failed to read {}", path.display()))?).to_string(),
		};
		Ok(strip_non_ascii(&content))
	}
}

/// Pick an extractor by file extension.
pub fn extractor_for(path: &Path) -> Option<Box<dyn TextExtractor>> {
	let ext = path.extension().and_then(|s| s.to_str())?.to_ascii_lowercase();
	match ext.as_str() {
		"pdf" => Some(Box::new(PdfExtractor)),
		"txt" | "md" => Some(Box::new(PlainTextExtractor)),
		_ => None,
	}
}
