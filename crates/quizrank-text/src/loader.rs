use std::path::{Path, PathBuf};
use tracing::{info, warn};

use quizrank_core::chunker::ParagraphChunker;
use quizrank_core::config::{resolve_with_base, SourceConfig};
use quizrank_core::corpus::{CorpusSnapshot, CorpusSnapshotBuilder};
use quizrank_core::traits::Chunker;

use crate::extract::extractor_for;

/// Builds a [`CorpusSnapshot`] from source documents.
///
/// A source that is missing, of an unknown type, or fails extraction is
/// logged and skipped; the rest still load.
pub struct CorpusLoader {
	chunker: Box<dyn Chunker>,
}

impl Default for CorpusLoader {
	fn default() -> Self { Self::new(Box::new(ParagraphChunker::default())) }
}

impl CorpusLoader {
	pub fn new(chunker: Box<dyn Chunker>) -> Self { Self { chunker } }

	/// Load each configured `{category, path}`; relative paths resolve against `base`.
	pub fn load_sources(&self, sources: &[SourceConfig], base: &Path) -> CorpusSnapshot {
		let mut builder = CorpusSnapshot::builder();
		for source in sources {
			let path = resolve_with_base(base, &source.path);
			builder = self.load_file(builder, &source.category, &path);
		}
		let snapshot = builder.build();
		info!(categories = snapshot.categories().len(), chunks = snapshot.total_chunks(), "corpus loaded");
		snapshot
	}

	/// Load every supported file under `data_dir`, in path order.
	///
	/// Files in a subdirectory belong to the category named after the first
	/// path component; top-level files form a category named after their stem.
	pub fn load_directory(&self, data_dir: &Path) -> CorpusSnapshot {
		let files = list_source_files(data_dir);
		if files.is_empty() {
			warn!(dir = %data_dir.display(), "no supported documents found");
		}
		let mut builder = CorpusSnapshot::builder();
		for file_path in &files {
			let relative = file_path.strip_prefix(data_dir).unwrap_or(file_path);
			let category = category_for(relative);
			builder = self.load_file(builder, &category, file_path);
		}
		let snapshot = builder.build();
		info!(files = files.len(), categories = snapshot.categories().len(), chunks = snapshot.total_chunks(), "corpus loaded");
		snapshot
	}

	fn load_file(&self, builder: CorpusSnapshotBuilder, category: &str, path: &Path) -> CorpusSnapshotBuilder {
		if !path.exists() {
			warn!(category, path = %path.display(), "source not found, skipping");
			return builder;
		}
		let Some(extractor) = extractor_for(path) else {
			warn!(category, path = %path.display(), "unsupported document type, skipping");
			return builder;
		};
		match extractor.extract(path) {
			Ok(text) => {
				let chunks = self.chunker.chunk(&text);
				info!(category, path = %path.display(), chunks = chunks.len(), "loaded document");
				builder.extend(category, chunks)
			}
			Err(e) => {
				warn!(category, path = %path.display(), error = %e, "extraction failed, skipping");
				builder
			}
		}
	}
}

fn category_for(relative: &Path) -> String {
	let components: Vec<_> = relative.components().collect();
	if components.len() >= 2 {
		components[0].as_os_str().to_string_lossy().to_string()
	} else {
		relative.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_else(|| "misc".to_string())
	}
}

fn list_source_files(root: &Path) -> Vec<PathBuf> {
	let mut files = Vec::new();
	for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
		let path = entry.path();
		if extractor_for(path).is_some() { files.push(path.to_path_buf()); }
	}
	files.sort();
	files
}
