//! Temporal grouping of transcript segments.

use std::collections::VecDeque;
use std::sync::LazyLock;

use lectern_core::{TranscriptSegment, VideoChunkConfig};
use regex::Regex;

/// Phrases that usually open a new topic in spoken lectures.
pub const TRANSITION_MARKERS: &[&str] = &[
    "now",
    "next",
    "moving on",
    "let's talk about",
    "another",
    "in conclusion",
    "to summarize",
    "finally",
    "lastly",
    "first",
    "second",
    "third",
    "meanwhile",
    "however",
    "but",
];

/// Silence (seconds) between segments that counts as a topic break.
pub const PAUSE_THRESHOLD: f64 = 3.0;

/// Only the opening of a segment is checked for transition markers.
const MARKER_WINDOW_CHARS: usize = 50;

static TRANSITION: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = TRANSITION_MARKERS
        .iter()
        .map(|m| regex::escape(m))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).expect("valid transition marker regex")
});

/// True when `next` likely starts a new topic after `last`: a long pause, or
/// a transition marker near the start of `next`.
pub fn is_logical_break(last: &TranscriptSegment, next: &TranscriptSegment) -> bool {
    if next.start - last.end > PAUSE_THRESHOLD {
        return true;
    }
    let opening: String = next
        .text
        .trim_start()
        .chars()
        .take(MARKER_WINDOW_CHARS)
        .collect::<String>()
        .to_lowercase();
    TRANSITION.is_match(&opening)
}

fn text_len(segment: &TranscriptSegment) -> usize {
    segment.text.trim().chars().count()
}

/// Length of the space-joined text of `group`.
pub(crate) fn group_text_len(group: &[TranscriptSegment]) -> usize {
    let lens: Vec<usize> = group.iter().map(text_len).filter(|&l| l > 0).collect();
    lens.iter().sum::<usize>() + lens.len().saturating_sub(1)
}

fn span(first: &TranscriptSegment, last: &TranscriptSegment) -> f64 {
    last.end - first.start
}

fn group_span(group: &[TranscriptSegment]) -> f64 {
    match (group.first(), group.last()) {
        (Some(first), Some(last)) => span(first, last),
        _ => 0.0,
    }
}

/// First pass: walk the segments in order, closing the current group when
/// the next segment would push it past `chunk_size` characters or
/// `max_segment_duration` seconds, or when a logical break follows a group
/// that already lasts `min_segment_duration`.
pub fn split_into_groups(
    segments: &[TranscriptSegment],
    config: &VideoChunkConfig,
) -> Vec<Vec<TranscriptSegment>> {
    let mut groups = Vec::new();
    let mut current: Vec<TranscriptSegment> = Vec::new();
    let mut current_len = 0usize;

    for segment in segments {
        let len = text_len(segment);
        if let (Some(first), Some(last)) = (current.first(), current.last()) {
            let joined = if len == 0 || current_len == 0 {
                current_len + len
            } else {
                current_len + 1 + len
            };
            let too_long = joined > config.chunk_size;
            let too_wide = span(first, segment) > config.max_segment_duration;
            let topic_break = span(first, last) >= config.min_segment_duration
                && is_logical_break(last, segment);

            if too_long || too_wide || topic_break {
                groups.push(std::mem::take(&mut current));
                current_len = 0;
            }
        }

        current_len = match (current_len, len) {
            (0, l) | (l, 0) => l,
            (c, l) => c + 1 + l,
        };
        current.push(segment.clone());
    }

    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

fn is_short(group: &[TranscriptSegment], config: &VideoChunkConfig) -> bool {
    group_span(group) < config.min_segment_duration || group_text_len(group) < config.chunk_size / 3
}

/// Second pass: fold groups that are too brief or too thin into a
/// neighbour. The following group is preferred, then the previous one; a
/// merge only happens when the combined span stays within
/// `max_segment_duration`. Groups that cannot merge are kept as they are.
pub fn merge_short_groups(
    groups: Vec<Vec<TranscriptSegment>>,
    config: &VideoChunkConfig,
) -> Vec<Vec<TranscriptSegment>> {
    let mut queue: VecDeque<Vec<TranscriptSegment>> = groups.into();
    let mut merged: Vec<Vec<TranscriptSegment>> = Vec::with_capacity(queue.len());

    while let Some(mut group) = queue.pop_front() {
        if group.is_empty() {
            continue;
        }
        if !is_short(&group, config) {
            merged.push(group);
            continue;
        }

        if let Some(next) = queue.front_mut() {
            let fits = match (group.first(), next.last()) {
                (Some(first), Some(last)) => span(first, last) <= config.max_segment_duration,
                _ => true,
            };
            if fits {
                group.append(next);
                *next = group;
                continue;
            }
        }

        if let Some(prev) = merged.last_mut() {
            let fits = match (prev.first(), group.last()) {
                (Some(first), Some(last)) => span(first, last) <= config.max_segment_duration,
                _ => true,
            };
            if fits {
                prev.append(&mut group);
                continue;
            }
        }

        merged.push(group);
    }
    merged
}

/// Partition `segments` into time-ordered, non-overlapping groups.
///
/// Segments are sorted by start time first, so callers need not pre-sort.
/// Every segment lands in exactly one group.
pub fn group_segments(
    segments: &[TranscriptSegment],
    config: &VideoChunkConfig,
) -> Vec<Vec<TranscriptSegment>> {
    if segments.is_empty() {
        return Vec::new();
    }

    let mut ordered = segments.to_vec();
    ordered.sort_by(|a, b| a.start.total_cmp(&b.start));

    let groups = split_into_groups(&ordered, config);
    let initial = groups.len();
    let groups = merge_short_groups(groups, config);

    tracing::debug!(
        segments = ordered.len(),
        initial_groups = initial,
        groups = groups.len(),
        "transcript segments grouped"
    );
    groups
}
