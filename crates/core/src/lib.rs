pub mod config;
pub mod document;
pub mod error;
pub mod transcript;

pub use config::{ChunkingMode, Config, DocumentChunkConfig, VideoChunkConfig};
pub use document::*;
pub use error::*;
pub use transcript::*;
