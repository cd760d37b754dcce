//! Boundary-safe character windows over one section.

use lectern_core::{find_page, DocumentChunkConfig, PageMap};

use super::helpers::slugify;
use super::lists::atomic_spans;
use super::types::{AtomicSpan, Chunk};

/// Span strictly containing `pos`, if any. Spans are sorted and disjoint.
fn span_around(spans: &[AtomicSpan], pos: usize) -> Option<&AtomicSpan> {
    let idx = spans.partition_point(|s| s.end_char <= pos);
    spans.get(idx).filter(|s| s.strictly_contains(pos))
}

/// Cut `text` (one section) into overlapping character windows.
///
/// Windows are `chunk_size` characters, each starting `chunk_overlap`
/// characters before the previous one ended. A window end that would cut a
/// list or table (per `keep_lists_intact` / `keep_tables_intact`) snaps back
/// to the span start, or forward to its end when snapping back would leave
/// less than half a window or would not pass the previous chunk's end.
/// Offsets on the returned chunks are document-level:
/// `section_offset` is the section's character offset in the document.
///
/// Chunk ids are `{section-slug}-{n}`; [`DocumentChunker`](super::DocumentChunker)
/// renumbers them per document.
pub fn chunk_section(
    text: &str,
    section_title: &str,
    section_offset: usize,
    page_map: Option<&PageMap>,
    config: &DocumentChunkConfig,
) -> Vec<Chunk> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    if len == 0 {
        return Vec::new();
    }

    let chunk_size = config.chunk_size.max(1);
    let overlap = config.chunk_overlap;
    let spans = if config.keep_lists_intact || config.keep_tables_intact {
        atomic_spans(text, config.keep_lists_intact, config.keep_tables_intact)
    } else {
        Vec::new()
    };

    let slug = slugify(section_title);
    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut prev_end = 0usize;

    while start < len {
        let mut end = (start + chunk_size).min(len);

        if let Some(span) = span_around(&spans, end) {
            let back_ok = span.start_char > start.max(prev_end)
                && (span.start_char - start) * 2 >= chunk_size;
            if back_ok {
                end = span.start_char;
            } else {
                end = span.end_char;
            }
            tracing::debug!(
                section = section_title,
                span_start = span.start_char,
                span_end = span.end_char,
                end,
                "window end snapped to span edge"
            );
        }

        let window: String = chars[start..end].iter().collect();
        let trimmed = window.trim();
        if !trimmed.is_empty() {
            chunks.push(Chunk {
                chunk_id: format!("{slug}-{}", chunks.len()),
                index: chunks.len(),
                section_title: section_title.to_string(),
                text: trimmed.to_string(),
                start_char: section_offset + start,
                end_char: section_offset + end,
                page_number: find_page(section_offset + start, page_map),
            });
        }

        if end >= len {
            break;
        }
        prev_end = end;

        let mut next = end.saturating_sub(overlap).max(start + 1);
        if let Some(span) = span_around(&spans, next) {
            next = span.end_char;
        }
        start = next;
    }

    chunks
}
