//! Tests for transcript grouping and chunk assembly.

use super::*;

/// About 120 characters of topic-neutral lecture text.
fn sentence(id: u32) -> String {
    format!(
        "Segment {id} walks through the worked example on the board, \
         showing each intermediate value of the running total carefully."
    )
}

fn seg(id: u32, start: f64, end: f64) -> TranscriptSegment {
    TranscriptSegment::new(id, start, end, sentence(id))
}

fn ids(chunks: &[VideoChunk]) -> Vec<Vec<u32>> {
    chunks.iter().map(|c| c.segment_ids.clone()).collect()
}

// ── Grouping ────────────────────────────────────────────────────────

#[test]
fn pause_splits_two_topics() {
    let segments = vec![
        seg(0, 0.0, 8.0),
        seg(1, 9.0, 16.0),
        seg(2, 17.0, 24.0),
        seg(3, 40.0, 48.0),
        seg(4, 49.0, 56.0),
        seg(5, 57.0, 64.0),
    ];
    let chunker = TranscriptChunker::new(VideoChunkConfig::default());
    let chunks = chunker.chunk(&Transcript::new(segments, "en"), &Map::new());

    assert_eq!(ids(&chunks), vec![vec![0, 1, 2], vec![3, 4, 5]]);
    assert_eq!((chunks[1].start_time, chunks[1].end_time), (40.0, 64.0));
    assert_eq!(chunks[1].metadata.timestamp_display, "00:40");
}

#[test]
fn lone_short_segment_folds_into_neighbour() {
    let mut segments = vec![seg(0, 0.0, 8.0), seg(1, 9.0, 16.0), seg(2, 17.0, 24.0)];
    // Long pause, then a 2 s remark.
    segments.push(TranscriptSegment::new(3, 40.0, 42.0, "Quick aside."));
    let chunks = TranscriptChunker::new(VideoChunkConfig::default())
        .chunk(&Transcript::new(segments, "en"), &Map::new());
    assert_eq!(ids(&chunks), vec![vec![0, 1, 2, 3]]);
}

#[test]
fn only_segment_stays_alone() {
    let segments = vec![TranscriptSegment::new(7, 0.0, 2.0, "Hi.")];
    let chunks = TranscriptChunker::new(VideoChunkConfig::default())
        .chunk(&Transcript::new(segments, "en"), &Map::new());
    assert_eq!(ids(&chunks), vec![vec![7]]);
    assert_eq!(chunks[0].metadata.duration_display, "2s");
}

#[test]
fn empty_transcript_has_no_chunks() {
    let chunks = TranscriptChunker::new(VideoChunkConfig::default())
        .chunk(&Transcript::new(vec![], "en"), &Map::new());
    assert!(chunks.is_empty());
}

#[test]
fn long_lecture_respects_max_duration() {
    // Two hours of back-to-back 5 s segments.
    let segments: Vec<TranscriptSegment> =
        (0..1440).map(|i| seg(i, f64::from(i) * 5.0, f64::from(i) * 5.0 + 5.0)).collect();
    let config = VideoChunkConfig {
        chunk_size: 100_000,
        ..VideoChunkConfig::default()
    };
    let chunks =
        TranscriptChunker::new(config).chunk(&Transcript::new(segments, "en"), &Map::new());

    assert!(chunks.iter().all(|c| c.metadata.duration <= 120.0));
    assert_eq!(chunks.iter().map(|c| c.segment_ids.len()).sum::<usize>(), 1440);
    assert_eq!(
        chunks.last().map(|c| c.metadata.timestamp_display.as_str()),
        Some("01:58:00")
    );
}

#[test]
fn transition_marker_starts_new_chunk() {
    let segments = vec![
        seg(0, 0.0, 6.0),
        seg(1, 6.0, 12.0),
        seg(2, 12.0, 18.0),
        TranscriptSegment::new(3, 18.0, 24.0, format!("Moving on, {}", sentence(3))),
        seg(4, 24.0, 30.0),
        seg(5, 30.0, 36.0),
    ];
    let chunks = TranscriptChunker::new(VideoChunkConfig::default())
        .chunk(&Transcript::new(segments, "en"), &Map::new());
    assert_eq!(ids(&chunks), vec![vec![0, 1, 2], vec![3, 4, 5]]);
}

// ── Chunk metadata ──────────────────────────────────────────────────

#[test]
fn chunks_carry_language_and_video_metadata() {
    let segments = vec![seg(0, 0.0, 8.0).with_logprob(-0.1), seg(1, 8.0, 16.0)];
    let mut meta = Map::new();
    meta.insert("course_id".into(), Value::from("cs101"));

    let chunks = TranscriptChunker::new(VideoChunkConfig::default())
        .chunk(&Transcript::new(segments, "de"), &meta);
    let chunk = &chunks[0];
    assert_eq!(chunk.metadata.language, "de");
    assert_eq!(chunk.metadata.extra.get("course_id"), Some(&Value::from("cs101")));
    assert!((chunk.metadata.avg_confidence - (-0.1f64).exp()).abs() < 1e-9);
    assert!(chunk.content.starts_with("Segment 0 walks"));
}

#[test]
fn overlap_option_is_accepted_but_not_applied() {
    let config = VideoChunkConfig {
        chunk_overlap: 50,
        ..VideoChunkConfig::default()
    };
    let segments = vec![
        seg(0, 0.0, 8.0),
        seg(1, 9.0, 16.0),
        seg(2, 40.0, 52.0),
        seg(3, 52.0, 60.0),
    ];
    let chunks =
        TranscriptChunker::new(config).chunk(&Transcript::new(segments, "en"), &Map::new());
    let mut seen: Vec<u32> = chunks.iter().flat_map(|c| c.segment_ids.clone()).collect();
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2, 3]);
}
