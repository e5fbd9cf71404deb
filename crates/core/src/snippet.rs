//! Snippet selection for search results.
//!
//! Pure string functions: given a document's extracted text and the user
//! query, pick a bounded excerpt that shows why the document matched.

/// Context kept on each side of a matched term, in characters.
const MATCH_CONTEXT: usize = 100;
/// Length of the leading excerpt, in characters, used when no query term
/// matches.
const FALLBACK_PREFIX: usize = 200;
const ELLIPSIS: &str = "...";

/// Query tokens that take part in matching and highlighting: lowercased,
/// whitespace-split, and filtered to tokens longer than three characters
/// (characters, not bytes, so "für" is filtered like "the").
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|token| token.chars().count() > 3)
        .map(ToString::to_string)
        .collect()
}

/// Extracts a representative snippet of `content` for `query`.
///
/// Terms are tried in the order they appear in the query and the first
/// one found case-insensitively in the content wins; the match is wrapped
/// in a window of [`MATCH_CONTEXT`] on both sides, clamped to the content
/// bounds. When nothing matches the leading [`FALLBACK_PREFIX`] of the
/// content is returned instead. Content shorter than the window is
/// returned whole.
pub fn select_snippet(content: &str, query: &str) -> String {
    let lowered = content.to_lowercase();

    for term in query_terms(query) {
        if let Some(found) = lowered.find(&term) {
            let anchor = floor_char_boundary(content, found);
            let start = back_by_chars(content, anchor, MATCH_CONTEXT);
            let end = forward_by_chars(content, anchor, MATCH_CONTEXT);
            return format!("{ELLIPSIS}{}{ELLIPSIS}", content[start..end].trim());
        }
    }

    let end = forward_by_chars(content, 0, FALLBACK_PREFIX);
    format!("{}{ELLIPSIS}", content[..end].trim())
}

/// Byte offset `count` characters before `from` (a char boundary),
/// clamped to the start of the text.
fn back_by_chars(text: &str, from: usize, count: usize) -> usize {
    if count == 0 {
        return from;
    }
    text[..from]
        .char_indices()
        .rev()
        .nth(count - 1)
        .map(|(index, _)| index)
        .unwrap_or(0)
}

/// Byte offset `count` characters after `from` (a char boundary),
/// clamped to the end of the text.
fn forward_by_chars(text: &str, from: usize, count: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(count)
        .map(|(offset, _)| from + offset)
        .unwrap_or(text.len())
}

/// Largest char boundary in `text` that is `<= index` (clamped to the
/// text length). Lowercasing can shift byte offsets for non-ASCII text,
/// so every offset derived from a lowered copy goes through these.
pub(crate) fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Smallest char boundary in `text` that is `>= index`, capped at the
/// text length.
pub(crate) fn ceil_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
