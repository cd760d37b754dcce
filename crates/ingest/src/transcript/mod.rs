//! Transcript chunking.
//!
//! Groups timestamped speech segments into chunks that respect a text
//! budget, a maximum time span, and likely topic changes, then attaches
//! display and confidence metadata to each group.

mod chunk;
mod grouper;

pub use chunk::{
    avg_confidence, build_chunk, format_duration, format_timestamp, VideoChunk,
    VideoChunkMetadata,
};
pub use grouper::{
    group_segments, is_logical_break, merge_short_groups, split_into_groups, PAUSE_THRESHOLD,
    TRANSITION_MARKERS,
};
pub use lectern_core::{Transcript, TranscriptSegment, VideoChunkConfig};

use serde_json::{Map, Value};

/// Chunks transcripts with one fixed configuration.
#[derive(Debug, Clone)]
pub struct TranscriptChunker {
    config: VideoChunkConfig,
}

impl TranscriptChunker {
    pub fn new(config: VideoChunkConfig) -> Self {
        if config.chunk_overlap > 0 {
            tracing::debug!(
                chunk_overlap = config.chunk_overlap,
                "transcript chunk overlap is ignored; groups never share segments"
            );
        }
        Self { config }
    }

    pub fn config(&self) -> &VideoChunkConfig {
        &self.config
    }

    /// Group the transcript's segments and build one chunk per group.
    /// `metadata` is copied into every chunk's metadata.
    pub fn chunk(&self, transcript: &Transcript, metadata: &Map<String, Value>) -> Vec<VideoChunk> {
        let chunks: Vec<VideoChunk> = group_segments(&transcript.segments, &self.config)
            .iter()
            .filter_map(|group| build_chunk(group, &transcript.language, metadata))
            .collect();

        tracing::debug!(
            language = %transcript.language,
            segments = transcript.segments.len(),
            chunks = chunks.len(),
            "transcript chunked"
        );
        chunks
    }
}

#[cfg(test)]
mod tests;
