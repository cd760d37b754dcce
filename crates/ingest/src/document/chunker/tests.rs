//! Tests for the chunking engine.

use super::*;
use crate::document::{ExtractedDocument, PageContent};

fn config(chunk_size: usize, chunk_overlap: usize) -> DocumentChunkConfig {
    DocumentChunkConfig {
        chunk_size,
        chunk_overlap,
        ..DocumentChunkConfig::default()
    }
}

fn prose(len: usize) -> String {
    "the quick brown fox jumps over the lazy dog "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

fn make_doc(pages: Vec<(u32, &str)>) -> ExtractedDocument {
    ExtractedDocument {
        filename: "test.txt".to_string(),
        file_type: "txt".to_string(),
        pages: pages
            .into_iter()
            .map(|(num, text)| PageContent {
                page_number: num,
                text: text.to_string(),
            })
            .collect(),
    }
}

/// 399 prose chars, then a numbered list spanning `[400, 900)`, then prose.
fn text_with_list() -> String {
    let mut text = prose(399);
    text.push('\n');
    for n in 1..=12 {
        let width = if n == 12 { 38 } else { 41 };
        let mut line = format!("{n}. step");
        while line.chars().count() < width {
            line.push('x');
        }
        text.push_str(&line);
        if n < 12 {
            text.push('\n');
        }
    }
    text.push('\n');
    text.push_str(&prose(300));
    text
}

// ── Character windows ───────────────────────────────────────────────

#[test]
fn plain_text_window_starts() {
    let text = prose(2500);
    let chunks = chunk_document(&text, None, &DocumentMetadata::new("doc"), &config(1000, 200));
    let starts: Vec<usize> = chunks.iter().map(|c| c.start_char).collect();
    let ends: Vec<usize> = chunks.iter().map(|c| c.end_char).collect();
    assert_eq!(starts, vec![0, 800, 1600]);
    assert_eq!(ends, vec![1000, 1800, 2500]);
}

#[test]
fn list_span_is_never_cut() {
    let text = text_with_list();
    assert_eq!(detect_list_spans(&text), vec![AtomicSpan::list(400, 900)]);

    let chunks = chunk_document(&text, None, &DocumentMetadata::new("doc"), &config(500, 50));
    let bounds: Vec<(usize, usize)> = chunks.iter().map(|c| (c.start_char, c.end_char)).collect();
    assert_eq!(bounds, vec![(0, 400), (350, 900), (900, 1201)]);
    for (start, end) in bounds {
        assert!(!(400 < start && start < 900), "start {start} inside list");
        assert!(!(400 < end && end < 900), "end {end} inside list");
    }
}

#[test]
fn list_span_is_cut_when_not_preserved() {
    let text = text_with_list();
    let mut cfg = config(500, 50);
    cfg.keep_lists_intact = false;
    let chunks = chunk_document(&text, None, &DocumentMetadata::new("doc"), &cfg);
    assert_eq!(chunks[0].end_char, 500);
}

#[test]
fn empty_text_has_no_chunks() {
    let meta = DocumentMetadata::new("doc");
    assert!(chunk_document("", None, &meta, &config(100, 10)).is_empty());
    assert!(chunk_document("\n\n  \n", None, &meta, &config(100, 10)).is_empty());
}

// ── Sections ────────────────────────────────────────────────────────

#[test]
fn chunks_carry_section_titles() {
    let text = format!("INTRODUCTION\n{}\n\n2 Core Ideas\n{}", prose(150), prose(150));
    let chunks = chunk_document(&text, None, &DocumentMetadata::new("doc"), &config(100, 0));
    assert_eq!(chunks[0].section_title, "INTRODUCTION");
    assert_eq!(chunks.last().map(|c| c.section_title.as_str()), Some("2 Core Ideas"));
    assert!(chunks.iter().all(|c| c.section_title != MAIN_CONTENT));
}

#[test]
fn chunk_offsets_are_document_level() {
    let text = format!("Preamble text here.\nSUMMARY\n{}", prose(80));
    let chunks = chunk_document(&text, None, &DocumentMetadata::new("doc"), &config(50, 10));
    let chars: Vec<char> = text.chars().collect();
    for c in &chunks {
        let window: String = chars[c.start_char..c.end_char].iter().collect();
        assert_eq!(window.trim(), c.text);
    }
}

#[test]
fn chunk_ids_are_global_and_sequential() {
    let text = format!("PART ONE\n{}\nPART TWO\n{}", prose(120), prose(120));
    let chunks = chunk_document(&text, None, &DocumentMetadata::new("lesson-7"), &config(60, 0));
    for (i, c) in chunks.iter().enumerate() {
        assert_eq!(c.index, i);
        assert_eq!(c.chunk_id, format!("lesson-7#{i}"));
    }
}

// ── Pages ───────────────────────────────────────────────────────────

#[test]
fn chunks_resolve_pages() {
    let page_one = prose(100);
    let page_two = prose(100);
    let doc = make_doc(vec![(1, &page_one), (2, &page_two)]);
    let chunker = DocumentChunker::new(config(60, 0));
    let chunks = chunker.chunk_extracted(&doc, &DocumentMetadata::new("doc"));

    assert_eq!(chunks.first().and_then(|c| c.page_number), Some(1));
    assert_eq!(chunks.last().and_then(|c| c.page_number), Some(2));
    for c in &chunks {
        // Page 1 covers [0, 99]; the separator gap resolves to page 2.
        let expected = if c.start_char < 100 { 1 } else { 2 };
        assert_eq!(c.page_number, Some(expected), "chunk at {}", c.start_char);
    }
}

#[test]
fn no_page_map_means_no_page_numbers() {
    let chunks = chunk_document(&prose(300), None, &DocumentMetadata::new("doc"), &config(100, 0));
    assert!(chunks.iter().all(|c| c.page_number.is_none()));
}

// ── Modes ───────────────────────────────────────────────────────────

#[test]
fn auto_mode_uses_structural_with_section_headers() {
    let mut cfg = config(100, 0);
    cfg.section_headers = vec!["Module".to_string()];
    assert_eq!(cfg.resolved_mode(), ChunkingMode::Structural);

    let text = "Module 1 basics\n| a | b |\n| 1 | 2 |\nSome closing words.";
    let chunks = chunk_document(text, None, &DocumentMetadata::new("doc"), &cfg);
    // Short document: one section, table kept whole.
    assert!(chunks.iter().all(|c| c.section_title == MAIN_CONTENT));
    assert!(chunks.iter().any(|c| c.text == "| a | b |\n| 1 | 2 |"));
    assert_eq!(chunks[0].chunk_id, "doc#0");
}

#[test]
fn explicit_sectioned_mode_ignores_structural() {
    let mut cfg = config(100, 0);
    cfg.section_headers = vec!["Module".to_string()];
    cfg.mode = ChunkingMode::Sectioned;

    let text = format!("Module 1 basics\n{}", prose(150));
    let chunks = chunk_document(&text, None, &DocumentMetadata::new("doc"), &cfg);
    // Keyword header still titles the section in sectioned mode.
    assert_eq!(chunks[0].section_title, "Module 1 basics");
    assert!(chunks[0].text.starts_with("Module 1 basics"));
}

#[test]
fn chunker_reuses_config() {
    let chunker = DocumentChunker::new(config(100, 100));
    assert_eq!(chunker.config().chunk_size, 100);
    let chunks = chunker.chunk(&prose(105), None, &DocumentMetadata::new("doc"));
    // Overlap equal to the size still terminates.
    assert_eq!(chunks.last().map(|c| c.end_char), Some(105));
}
