use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{LecternError, Result};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_f64(profile: &str, key: &str, default: f64) -> f64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key).as_deref() {
        Some("true" | "1" | "yes") => true,
        Some("false" | "0" | "no") => false,
        _ => default,
    }
}

/// Comma-separated list, blanks dropped.
fn profiled_env_list(profile: &str, key: &str) -> Vec<String> {
    profiled_env_opt(profile, key)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub document: DocumentChunkConfig,
    pub video: VideoChunkConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `LECTERN_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("LECTERN_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            document: DocumentChunkConfig::from_env_profiled(p),
            video: VideoChunkConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    pub fn validate(&self) -> Result<()> {
        self.document.validate()?;
        self.video.validate()
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  document:    chunk_size={}, overlap={}, lists_intact={}, tables_intact={}, mode={:?}, headers={:?}",
            self.document.chunk_size,
            self.document.chunk_overlap,
            self.document.keep_lists_intact,
            self.document.keep_tables_intact,
            self.document.mode,
            self.document.section_headers,
        );
        tracing::info!(
            "  video:       chunk_size={}, min_duration={}s, max_duration={}s",
            self.video.chunk_size,
            self.video.min_segment_duration,
            self.video.max_segment_duration,
        );
    }

    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "document": self.document,
            "video": self.video,
        })
    }
}

// ── Document chunking ─────────────────────────────────────────

/// Which document chunker runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkingMode {
    /// Structural when section headers are configured, sectioned otherwise.
    #[default]
    Auto,
    /// Section identifier + boundary-safe character windows.
    Sectioned,
    /// Header split + table/list/prose blocks.
    Structural,
}

impl ChunkingMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "sectioned" | "section" | "character" => Some(Self::Sectioned),
            "structural" | "block" | "blocks" => Some(Self::Structural),
            _ => None,
        }
    }
}

/// Options for document chunking. All sizes are in characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentChunkConfig {
    /// Window size (default: 3000).
    pub chunk_size: usize,
    /// Characters repeated between adjacent chunks (default: 200).
    pub chunk_overlap: usize,
    /// Never split a pipe-delimited table (default: true).
    pub keep_tables_intact: bool,
    /// Never split a bulleted/numbered list (default: true).
    pub keep_lists_intact: bool,
    /// Header keywords such as "Chapter" or "Part".
    pub section_headers: Vec<String>,
    pub mode: ChunkingMode,
}

impl Default for DocumentChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 3000,
            chunk_overlap: 200,
            keep_tables_intact: true,
            keep_lists_intact: true,
            section_headers: Vec::new(),
            mode: ChunkingMode::Auto,
        }
    }
}

impl DocumentChunkConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            chunk_size: profiled_env_usize(p, "CHUNK_SIZE", defaults.chunk_size),
            chunk_overlap: profiled_env_usize(p, "CHUNK_OVERLAP", defaults.chunk_overlap),
            keep_tables_intact: profiled_env_bool(
                p,
                "KEEP_TABLES_INTACT",
                defaults.keep_tables_intact,
            ),
            keep_lists_intact: profiled_env_bool(
                p,
                "KEEP_LISTS_INTACT",
                defaults.keep_lists_intact,
            ),
            section_headers: profiled_env_list(p, "SECTION_HEADERS"),
            mode: profiled_env_opt(p, "CHUNKING_MODE")
                .and_then(|m| ChunkingMode::parse(&m))
                .unwrap_or_default(),
        }
    }

    /// Parse camelCase JSON options; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Options from `json` when given, otherwise `fallback`. Only the
    /// returned config is validated.
    pub fn from_json_or(json: Option<&str>, fallback: Self) -> Result<Self> {
        match json {
            Some(json) => Self::from_json(json),
            None => {
                fallback.validate()?;
                Ok(fallback)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(LecternError::InvalidConfig(
                "chunkSize must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Mode after resolving `Auto`.
    pub fn resolved_mode(&self) -> ChunkingMode {
        match self.mode {
            ChunkingMode::Auto if self.section_headers.is_empty() => ChunkingMode::Sectioned,
            ChunkingMode::Auto => ChunkingMode::Structural,
            other => other,
        }
    }
}

// ── Video / transcript chunking ───────────────────────────────

/// Options for transcript grouping. Durations are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoChunkConfig {
    /// Maximum characters of transcript text per chunk (default: 1000).
    pub chunk_size: usize,
    /// Accepted for option compatibility; segment groups never overlap.
    pub chunk_overlap: usize,
    /// Groups shorter than this are merged with a neighbour (default: 10).
    pub min_segment_duration: f64,
    /// Upper bound on a chunk's time span (default: 120).
    pub max_segment_duration: f64,
}

impl Default for VideoChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 0,
            min_segment_duration: 10.0,
            max_segment_duration: 120.0,
        }
    }
}

impl VideoChunkConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            chunk_size: profiled_env_usize(p, "VIDEO_CHUNK_SIZE", defaults.chunk_size),
            chunk_overlap: profiled_env_usize(p, "VIDEO_CHUNK_OVERLAP", defaults.chunk_overlap),
            min_segment_duration: profiled_env_f64(
                p,
                "MIN_SEGMENT_DURATION",
                defaults.min_segment_duration,
            ),
            max_segment_duration: profiled_env_f64(
                p,
                "MAX_SEGMENT_DURATION",
                defaults.max_segment_duration,
            ),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_or(json: Option<&str>, fallback: Self) -> Result<Self> {
        match json {
            Some(json) => Self::from_json(json),
            None => {
                fallback.validate()?;
                Ok(fallback)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(LecternError::InvalidConfig(
                "chunkSize must be greater than zero".to_string(),
            ));
        }
        let (min, max) = (self.min_segment_duration, self.max_segment_duration);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max <= 0.0 {
            return Err(LecternError::InvalidConfig(format!(
                "segment durations must be finite and positive (min={min}, max={max})"
            )));
        }
        if min > max {
            return Err(LecternError::InvalidConfig(format!(
                "minSegmentDuration ({min}) exceeds maxSegmentDuration ({max})"
            )));
        }
        Ok(())
    }
}
