/// Drop every non-ASCII character.
pub fn strip_non_ascii(text: &str) -> String {
	text.chars().filter(char::is_ascii).collect()
}

/// ASCII-only text with all whitespace runs (newlines included) collapsed to
/// single spaces.
pub fn normalize_page(text: &str) -> String {
	strip_non_ascii(text).split_whitespace().collect::<Vec<_>>().join(" ")
}
