//! Video chunk assembly from a group of transcript segments.

use lectern_core::TranscriptSegment;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Log-probabilities at or below this are treated as missing.
const MIN_LOGPROB: f64 = -10.0;
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Metadata keys computed per chunk; caller metadata cannot override them.
const COMPUTED_KEYS: [&str; 5] = [
    "duration",
    "avg_confidence",
    "language",
    "timestamp_display",
    "duration_display",
];

/// A time-bounded chunk of transcript text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoChunk {
    /// Segment texts joined by single spaces.
    pub content: String,
    pub start_time: f64,
    pub end_time: f64,
    pub segment_ids: Vec<u32>,
    pub metadata: VideoChunkMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoChunkMetadata {
    pub duration: f64,
    /// Mean per-segment confidence in `[0, 1]`.
    pub avg_confidence: f64,
    pub language: String,
    /// Chunk start as `MM:SS`, or `HH:MM:SS` past the first hour.
    pub timestamp_display: String,
    /// Chunk length as `45s`, `2m 5s`, or `1h 3m`.
    pub duration_display: String,
    /// Caller-supplied video metadata, minus keys that collide with the
    /// computed fields above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Build the chunk for one segment group. `None` for an empty group.
pub fn build_chunk(
    group: &[TranscriptSegment],
    language: &str,
    extra: &Map<String, Value>,
) -> Option<VideoChunk> {
    let first = group.first()?;
    let last = group.last()?;

    let content = group
        .iter()
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let start_time = first.start;
    let end_time = last.end.max(start_time);
    let duration = end_time - start_time;

    Some(VideoChunk {
        content,
        start_time,
        end_time,
        segment_ids: group.iter().map(|s| s.id).collect(),
        metadata: VideoChunkMetadata {
            duration,
            avg_confidence: avg_confidence(group),
            language: language.to_string(),
            timestamp_display: format_timestamp(start_time),
            duration_display: format_duration(duration),
            extra: extra
                .iter()
                .filter(|(key, _)| !COMPUTED_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        },
    })
}

/// Mean of `exp(avg_logprob)` over segments with a usable log-probability,
/// clamped to `[0, 1]`. `0.5` when no segment has one.
pub fn avg_confidence(group: &[TranscriptSegment]) -> f64 {
    let probs: Vec<f64> = group
        .iter()
        .filter_map(|s| s.avg_logprob)
        .filter(|&lp| lp > MIN_LOGPROB)
        .map(f64::exp)
        .collect();
    if probs.is_empty() {
        return DEFAULT_CONFIDENCE;
    }
    (probs.iter().sum::<f64>() / probs.len() as f64).clamp(0.0, 1.0)
}

/// `MM:SS` below an hour, `HH:MM:SS` from then on. Fractions are dropped.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Human-readable length rounded to the second.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    match total {
        0..=59 => format!("{total}s"),
        60..=3599 => format!("{}m {}s", total / 60, total % 60),
        _ => format!("{}h {}m", total / 3600, (total % 3600) / 60),
    }
}
