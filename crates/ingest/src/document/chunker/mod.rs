//! Document chunking engine.
//!
//! Splits extracted document text into retrieval-sized chunks that keep
//! their page attribution and never cut a list or table in half. Two
//! strategies: sectioned character windows (headers detected per line) and
//! structural blocks (tables, lists, and sentence-packed prose).

mod blocks;
mod helpers;
mod lists;
mod sections;
mod strategies;
mod types;
mod window;

pub use blocks::{chunk_structural, identify_blocks};
pub use lectern_core::{find_page, ChunkingMode, DocumentChunkConfig, PageMap, PageRange};
pub use lists::{atomic_spans, detect_list_spans, detect_table_spans, is_list_item};
pub use sections::identify_sections;
pub use strategies::{chunk_document, DocumentChunker};
pub use types::{
    AtomicSpan, Block, BlockKind, Chunk, DocumentMetadata, Section, SpanKind, MAIN_CONTENT,
};
pub use window::chunk_section;

#[cfg(test)]
mod tests;
