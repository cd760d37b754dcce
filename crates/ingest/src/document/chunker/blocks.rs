//! Structural block chunking: tables and lists stay whole, prose is packed
//! sentence by sentence.

use std::sync::LazyLock;

use lectern_core::{find_page, DocumentChunkConfig, PageMap};
use regex::Regex;

use super::helpers::{char_len, overlap_start, sentence_ranges, CharIndex};
use super::lists::LIST_MARKER;
use super::sections::keyword_regex;
use super::types::{Block, BlockKind, Chunk, DocumentMetadata, MAIN_CONTENT};

static BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    let table = r"(?P<table>(?:^[ \t]*\|[^\n]*\|[ \t]*(?:\n|\z)){2,})";
    let list = format!(
        r"(?P<list>(?:^[ \t]*{LIST_MARKER}[ \t]+[^\n]*(?:\n|\z)(?:^[ \t]+[^\s|][^\n]*(?:\n|\z))*)+)"
    );
    Regex::new(&format!("(?m){table}|{list}")).expect("valid block regex")
});

/// Split `text` into table, list, and text blocks (byte offsets).
///
/// Tables are runs of two or more pipe-delimited rows; lists are runs of
/// list items with their indented continuation lines. An indented pipe row
/// does not continue a list, so a table nested under an item is its own block. Non-blank text
/// between them becomes `Text` blocks, so text without any structure is a
/// single `Text` block.
pub fn identify_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut cursor = 0usize;

    for caps in BLOCKS.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        push_text(text, cursor, m.start(), &mut blocks);

        let kind = if caps.name("table").is_some() {
            BlockKind::Table
        } else {
            BlockKind::List
        };
        let (start, end) = trimmed(text, m.start(), m.end());
        if start < end {
            blocks.push(Block { kind, start, end });
        }
        cursor = m.end();
    }
    push_text(text, cursor, text.len(), &mut blocks);
    blocks
}

fn push_text(text: &str, start: usize, end: usize, blocks: &mut Vec<Block>) {
    let (start, end) = trimmed(text, start, end);
    if start < end {
        blocks.push(Block {
            kind: BlockKind::Text,
            start,
            end,
        });
    }
}

/// Byte range of `text[start..end]` without surrounding whitespace.
fn trimmed(text: &str, start: usize, end: usize) -> (usize, usize) {
    let slice = &text[start..end];
    let lead = slice.len() - slice.trim_start().len();
    let trail = slice.len() - slice.trim_end().len();
    if lead == slice.len() {
        return (end, end);
    }
    (start + lead, end - trail)
}

/// A titled byte range of the document; content excludes the header line.
struct StructuralSection {
    title: String,
    start: usize,
    end: usize,
}

fn split_on_headers(text: &str, header_re: &Regex) -> Vec<StructuralSection> {
    let mut sections = Vec::new();
    let mut title = MAIN_CONTENT.to_string();
    let mut content_start = 0usize;
    let mut offset = 0usize;

    for line in text.split('\n') {
        let line_end = offset + line.len();
        if header_re.is_match(line) {
            if !text[content_start..offset].trim().is_empty() || title != MAIN_CONTENT {
                sections.push(StructuralSection {
                    title: std::mem::replace(&mut title, line.trim().to_string()),
                    start: content_start,
                    end: offset,
                });
            } else {
                title = line.trim().to_string();
            }
            content_start = (line_end + 1).min(text.len());
        }
        offset = line_end + 1;
    }
    sections.push(StructuralSection {
        title,
        start: content_start,
        end: text.len(),
    });
    sections
}

/// Chunk `text` block by block.
///
/// Sections come from lines starting with one of `config.section_headers`;
/// documents shorter than twice the chunk size are treated as a single
/// section. Tables and lists configured intact become one chunk each;
/// everything else is packed greedily by sentence up to `chunk_size`, each
/// new chunk repeating the last `chunk_overlap` characters of the previous
/// one.
pub fn chunk_structural(
    text: &str,
    page_map: Option<&PageMap>,
    metadata: &DocumentMetadata,
    config: &DocumentChunkConfig,
) -> Vec<Chunk> {
    let header_re = keyword_regex(&config.section_headers);
    chunk_structural_with(text, page_map, metadata, config, header_re.as_ref())
}

pub(crate) fn chunk_structural_with(
    text: &str,
    page_map: Option<&PageMap>,
    metadata: &DocumentMetadata,
    config: &DocumentChunkConfig,
    header_re: Option<&Regex>,
) -> Vec<Chunk> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let sections = match header_re {
        Some(re) if char_len(text) >= config.chunk_size.saturating_mul(2) => {
            split_on_headers(text, re)
        }
        _ => vec![StructuralSection {
            title: MAIN_CONTENT.to_string(),
            start: 0,
            end: text.len(),
        }],
    };

    let mut emitter = Emitter {
        text,
        index: CharIndex::new(text),
        page_map,
        doc_id: &metadata.doc_id,
        chunks: Vec::new(),
    };

    for section in &sections {
        let content = &text[section.start..section.end];
        for block in identify_blocks(content) {
            let (start, end) = (section.start + block.start, section.start + block.end);
            let intact = match block.kind {
                BlockKind::Table => config.keep_tables_intact,
                BlockKind::List => config.keep_lists_intact,
                BlockKind::Text => false,
            };
            if intact {
                emitter.emit(&section.title, start, end);
            } else {
                pack_sentences(&mut emitter, &section.title, start, end, config);
            }
        }
    }

    tracing::debug!(
        doc_id = %metadata.doc_id,
        sections = sections.len(),
        chunks = emitter.chunks.len(),
        "structural chunking complete"
    );
    emitter.chunks
}

fn pack_sentences(
    emitter: &mut Emitter<'_>,
    title: &str,
    start: usize,
    end: usize,
    config: &DocumentChunkConfig,
) {
    let text = emitter.text;
    let mut current: Option<(usize, usize)> = None;

    for (s, e) in sentence_ranges(&text[start..end]) {
        let (s, e) = (start + s, start + e);
        current = match current {
            None => Some((s, e)),
            Some((cs, _)) if char_len(&text[cs..e]) <= config.chunk_size => Some((cs, e)),
            Some((cs, ce)) => {
                emitter.emit(title, cs, ce);
                let next = if config.chunk_overlap > 0 {
                    overlap_start(text, cs, ce, config.chunk_overlap)
                } else {
                    s
                };
                Some((next, e))
            }
        };
    }
    if let Some((cs, ce)) = current {
        emitter.emit(title, cs, ce);
    }
}

struct Emitter<'a> {
    text: &'a str,
    index: CharIndex,
    page_map: Option<&'a PageMap>,
    doc_id: &'a str,
    chunks: Vec<Chunk>,
}

impl Emitter<'_> {
    fn emit(&mut self, title: &str, start: usize, end: usize) {
        let (start, end) = trimmed(self.text, start, end);
        if start >= end {
            return;
        }
        let start_char = self.index.char_at(start);
        let index = self.chunks.len();
        self.chunks.push(Chunk {
            chunk_id: format!("{}#{index}", self.doc_id),
            index,
            section_title: title.to_string(),
            text: self.text[start..end].to_string(),
            start_char,
            end_char: self.index.char_at(end),
            page_number: find_page(start_char, self.page_map),
        });
    }
}
