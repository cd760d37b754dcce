//! Chunk, section, and span types.

use serde::{Deserialize, Serialize};

/// Title used when a document (or its leading text) has no detected header.
pub const MAIN_CONTENT: &str = "Main Content";

// ── Chunk output ────────────────────────────────────────────────────────────

/// A chunk of text with metadata for attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable identifier, `{doc_id}#{index}` once produced by a `DocumentChunker`.
    pub chunk_id: String,
    /// 0-based index within the document.
    pub index: usize,
    /// Title of the section the chunk was cut from.
    pub section_title: String,
    /// Trimmed, non-empty chunk text.
    pub text: String,
    /// Character offset (inclusive) of the chunk window in the document.
    pub start_char: usize,
    /// Character offset (exclusive) of the chunk window in the document.
    pub end_char: usize,
    /// Page of `start_char`, when the document has a page map.
    pub page_number: Option<u32>,
}

/// Caller-supplied identity of the document being chunked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub doc_id: String,
}

impl DocumentMetadata {
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
        }
    }
}

// ── Sections ────────────────────────────────────────────────────────────────

/// A run of document lines introduced by a header (or the whole document).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    /// First line of the section (0-based).
    pub start_line: usize,
    /// One past the last line of the section.
    pub end_line: usize,
    /// Character offset of `start_line` in the document.
    pub start_char: usize,
    /// The section's lines joined with `\n`, header line included.
    pub text: String,
}

// ── Atomic spans ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanKind {
    List,
    Table,
}

/// A region no chunk boundary may cut through. Offsets are characters,
/// relative to the text the span was detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicSpan {
    pub start_char: usize,
    pub end_char: usize,
    pub kind: SpanKind,
}

impl AtomicSpan {
    pub fn list(start_char: usize, end_char: usize) -> Self {
        Self {
            start_char,
            end_char,
            kind: SpanKind::List,
        }
    }

    pub fn table(start_char: usize, end_char: usize) -> Self {
        Self {
            start_char,
            end_char,
            kind: SpanKind::Table,
        }
    }

    /// True when `pos` lies strictly between the span's edges.
    pub fn strictly_contains(&self, pos: usize) -> bool {
        self.start_char < pos && pos < self.end_char
    }
}

// ── Blocks ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Table,
    List,
    Text,
}

/// A structural block of a section. Offsets are byte offsets into the text
/// the block was identified in; `end` excludes trailing whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub start: usize,
    pub end: usize,
}
