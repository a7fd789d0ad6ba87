//! Query keyword extraction.

/// Words dropped from a query before scoring. Fixed; not configurable per call.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "to", "in", "on", "at", "for", "of", "with", "by", "similar", "questions",
    "about", "and", "or", "but", "generate", "create",
];

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Lowercase `query`, split on whitespace and drop stop words.
///
/// Order and duplicates are preserved: a keyword given twice is scored twice.
pub fn extract_keywords(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|w| !is_stop_word(w))
        .map(str::to_string)
        .collect()
}
