//! Parallel fan-out over many documents or transcripts.
//!
//! Each input is chunked independently on a rayon worker; results come back
//! in input order.

use lectern_core::{LecternError, PageMap, Result, Transcript};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::chunker::{Chunk, DocumentChunker, DocumentMetadata};
use crate::transcript::{TranscriptChunker, VideoChunk};

/// One document queued for chunking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    pub metadata: DocumentMetadata,
    pub text: String,
    #[serde(default)]
    pub page_map: Option<PageMap>,
}

/// One transcript queued for chunking, with the metadata copied onto its chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptInput {
    pub transcript: Transcript,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Chunk every document on the current rayon pool.
pub fn chunk_documents(inputs: &[DocumentInput], chunker: &DocumentChunker) -> Vec<Vec<Chunk>> {
    let results: Vec<Vec<Chunk>> = inputs
        .par_iter()
        .map(|input| chunker.chunk(&input.text, input.page_map.as_ref(), &input.metadata))
        .collect();

    tracing::debug!(
        documents = inputs.len(),
        chunks = results.iter().map(Vec::len).sum::<usize>(),
        "document batch chunked"
    );
    results
}

/// Chunk every transcript on the current rayon pool.
pub fn chunk_transcripts(
    inputs: &[TranscriptInput],
    chunker: &TranscriptChunker,
) -> Vec<Vec<VideoChunk>> {
    inputs
        .par_iter()
        .map(|input| chunker.chunk(&input.transcript, &input.metadata))
        .collect()
}

/// Run `work` on a dedicated pool of `threads` workers (0 = rayon's default).
pub fn with_threads<T, F>(threads: usize, work: F) -> Result<T>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| LecternError::Other(format!("failed to build chunking thread pool: {e}")))?;
    Ok(pool.install(work))
}
