//! List and table boundary detection.
//!
//! Produces the atomic spans the character chunker must not cut through.

use std::sync::LazyLock;

use regex::Regex;

use super::blocks::identify_blocks;
use super::helpers::CharIndex;
use super::types::{AtomicSpan, BlockKind};

/// Marker alternatives for a list item: `1.2`, `1.`, `1)`, `a.`, `A)`,
/// roman numerals, or a bullet glyph. Shared with the block regex.
pub(crate) const LIST_MARKER: &str =
    r"(?:\d+\.\d+\.?|\d+[.)]|[ivx]{1,5}[.)]|[IVX]{1,5}[.)]|[a-zA-Z][.)]|[•*◦▪▫–—●○-])";

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^[ \t]*{LIST_MARKER}[ \t]+")).expect("valid list item regex")
});

/// True when `line` starts with a list marker followed by whitespace.
pub fn is_list_item(line: &str) -> bool {
    LIST_ITEM.is_match(line)
}

fn is_indented(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// Detect bulleted/numbered list runs in `text`.
///
/// A run opens on the first list item and extends through further items,
/// blank lines, and indented continuation lines. The first non-indented,
/// non-empty, non-list line closes it. Spans end after the last non-blank
/// line of the run.
pub fn detect_list_spans(text: &str) -> Vec<AtomicSpan> {
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;
    let mut content_end = 0usize;
    let mut offset = 0usize;

    for line in text.split('\n') {
        let line_end = offset + line.chars().count();
        let blank = line.trim().is_empty();

        match open {
            None => {
                if is_list_item(line) {
                    open = Some(offset);
                    content_end = line_end;
                }
            }
            Some(start) => {
                if is_list_item(line) || (!blank && is_indented(line)) {
                    content_end = line_end;
                } else if !blank {
                    spans.push(AtomicSpan::list(start, content_end));
                    open = None;
                }
            }
        }

        offset = line_end + 1;
    }

    // A run still open at end of text closes at its final content offset.
    if let Some(start) = open {
        spans.push(AtomicSpan::list(start, content_end));
    }
    spans
}

/// Pipe-delimited table runs in `text`, found by the block detector.
pub fn detect_table_spans(text: &str) -> Vec<AtomicSpan> {
    let index = CharIndex::new(text);
    identify_blocks(text)
        .into_iter()
        .filter(|b| b.kind == BlockKind::Table)
        .map(|b| AtomicSpan::table(index.char_at(b.start), index.char_at(b.end)))
        .collect()
}

/// All atomic spans of `text`, sorted and coalesced so they are disjoint.
pub fn atomic_spans(text: &str, lists: bool, tables: bool) -> Vec<AtomicSpan> {
    let mut spans = Vec::new();
    if lists {
        spans.extend(detect_list_spans(text));
    }
    if tables {
        spans.extend(detect_table_spans(text));
    }
    spans.sort_by_key(|s| (s.start_char, s.end_char));

    let mut merged: Vec<AtomicSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        if span.end_char <= span.start_char {
            continue;
        }
        match merged.last_mut() {
            Some(last) if span.start_char < last.end_char => {
                last.end_char = last.end_char.max(span.end_char);
            }
            _ => merged.push(span),
        }
    }
    merged
}
