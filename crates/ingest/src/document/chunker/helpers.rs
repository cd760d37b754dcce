//! Character-offset and sentence utilities shared by the chunkers.

use std::sync::LazyLock;

use regex::Regex;

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+\s+").expect("valid sentence regex"));

/// Number of characters (not bytes) in `text`.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Converts byte offsets of one text into character offsets.
pub(crate) struct CharIndex {
    byte_starts: Vec<usize>,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            byte_starts: text.char_indices().map(|(b, _)| b).collect(),
        }
    }

    /// Character offset of the char starting at `byte` (or of the end of
    /// text when `byte == text.len()`).
    pub(crate) fn char_at(&self, byte: usize) -> usize {
        self.byte_starts.partition_point(|&b| b < byte)
    }
}

/// Byte ranges of the sentences in `text`. A sentence ends after a run of
/// `.`, `!` or `?` followed by whitespace; the tail is the last sentence.
/// Ranges are contiguous apart from the whitespace between sentences.
pub(crate) fn sentence_ranges(text: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END.find_iter(text) {
        let end = m.start() + m.as_str().trim_end().len();
        if !text[start..end].trim().is_empty() {
            ranges.push((start, end));
        }
        start = m.end();
    }
    if !text[start..].trim().is_empty() {
        ranges.push((start, text.len()));
    }
    ranges
}

/// Byte offset where the last `overlap` characters of `text[start..end]`
/// begin. Never returns `start` itself unless the range is empty, so a chunk
/// that carries overlap still starts after the chunk it overlaps.
pub(crate) fn overlap_start(text: &str, start: usize, end: usize, overlap: usize) -> usize {
    let slice = &text[start..end];
    let count = char_len(slice);
    if count == 0 {
        return start;
    }
    let skip = count.saturating_sub(overlap).max(1);
    slice
        .char_indices()
        .nth(skip)
        .map(|(b, _)| start + b)
        .unwrap_or(end)
}

/// Lower-case, dash-separated form of a section title for chunk ids.
pub(crate) fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("section");
    }
    slug
}
