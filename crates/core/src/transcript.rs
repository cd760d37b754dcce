use serde::{Deserialize, Serialize};

/// One timestamped span of speech produced by the transcription service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub id: u32,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds, greater than `start`.
    pub end: f64,
    pub text: String,
    /// Mean token log-probability reported by the ASR model, if any.
    #[serde(default)]
    pub avg_logprob: Option<f64>,
}

impl TranscriptSegment {
    pub fn new(id: u32, start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            id,
            start,
            end,
            text: text.into(),
            avg_logprob: None,
        }
    }

    pub fn with_logprob(mut self, avg_logprob: f64) -> Self {
        self.avg_logprob = Some(avg_logprob);
        self
    }
}

/// Full transcription result for a video or audio file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Segments ordered by `start`.
    pub segments: Vec<TranscriptSegment>,
    #[serde(default = "default_language")]
    pub language: String,
    /// Media duration in seconds.
    #[serde(default)]
    pub duration: f64,
}

fn default_language() -> String {
    "unknown".to_string()
}

impl Transcript {
    pub fn new(segments: Vec<TranscriptSegment>, language: impl Into<String>) -> Self {
        let duration = segments.last().map(|s| s.end).unwrap_or(0.0);
        Self {
            segments,
            language: language.into(),
            duration,
        }
    }
}
