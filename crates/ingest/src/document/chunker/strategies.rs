//! Chunking strategies: sectioned character windows and structural blocks.

use lectern_core::{ChunkingMode, DocumentChunkConfig, PageMap};
use regex::Regex;

use super::blocks::chunk_structural_with;
use super::sections::{keyword_regex, split_sections};
use super::types::{Chunk, DocumentMetadata};
use super::window::chunk_section;
use crate::document::ExtractedDocument;

/// Chunks documents with one fixed configuration.
///
/// Holds the compiled section-header regex so repeated calls (and batch
/// workers sharing the chunker) do not rebuild it.
#[derive(Debug, Clone)]
pub struct DocumentChunker {
    config: DocumentChunkConfig,
    header_re: Option<Regex>,
}

impl DocumentChunker {
    pub fn new(config: DocumentChunkConfig) -> Self {
        if config.chunk_overlap >= config.chunk_size {
            tracing::warn!(
                chunk_size = config.chunk_size,
                chunk_overlap = config.chunk_overlap,
                "chunk overlap is not smaller than chunk size; windows advance one character at a time"
            );
        }
        let header_re = keyword_regex(&config.section_headers);
        Self { config, header_re }
    }

    pub fn config(&self) -> &DocumentChunkConfig {
        &self.config
    }

    /// Chunk `text` with the configured mode.
    ///
    /// Chunks are numbered from 0 across the whole document and get ids of
    /// the form `{doc_id}#{index}`.
    pub fn chunk(
        &self,
        text: &str,
        page_map: Option<&PageMap>,
        metadata: &DocumentMetadata,
    ) -> Vec<Chunk> {
        let mode = self.config.resolved_mode();
        let mut chunks = match mode {
            ChunkingMode::Structural => chunk_structural_with(
                text,
                page_map,
                metadata,
                &self.config,
                self.header_re.as_ref(),
            ),
            _ => self.chunk_sectioned(text, page_map),
        };

        for (i, c) in chunks.iter_mut().enumerate() {
            c.index = i;
            c.chunk_id = format!("{}#{i}", metadata.doc_id);
        }

        tracing::debug!(
            doc_id = %metadata.doc_id,
            mode = ?mode,
            chunks = chunks.len(),
            "document chunked"
        );
        chunks
    }

    /// Chunk an extracted document, building its page map on the way.
    pub fn chunk_extracted(
        &self,
        doc: &ExtractedDocument,
        metadata: &DocumentMetadata,
    ) -> Vec<Chunk> {
        let (text, page_map) = doc.with_page_map();
        self.chunk(&text, page_map.as_ref(), metadata)
    }

    // ── Sectioned strategy ─────────────────────────────────────────────────

    fn chunk_sectioned(&self, text: &str, page_map: Option<&PageMap>) -> Vec<Chunk> {
        let sections = split_sections(text, self.header_re.as_ref());
        tracing::debug!(sections = sections.len(), "sections identified");

        sections
            .iter()
            .flat_map(|s| chunk_section(&s.text, &s.title, s.start_char, page_map, &self.config))
            .collect()
    }
}

/// One-shot convenience over [`DocumentChunker`].
pub fn chunk_document(
    text: &str,
    page_map: Option<&PageMap>,
    metadata: &DocumentMetadata,
    config: &DocumentChunkConfig,
) -> Vec<Chunk> {
    DocumentChunker::new(config.clone()).chunk(text, page_map, metadata)
}
