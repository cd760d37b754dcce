//! lectern-chunk: chunk documents and transcripts from the command line.
//!
//! Reads `.txt`/`.md` documents or transcript JSON, chunks them with the
//! configured options, and prints one JSON chunk per line on stdout.
//!
//! Options come from the environment (`CHUNK_SIZE`, `VIDEO_CHUNK_SIZE`, ...,
//! optionally prefixed by `LECTERN_PROFILE`) unless `--options` supplies a
//! JSON object. Only the options a subcommand actually uses are validated.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};

use lectern_core::config::{load_dotenv, Config, DocumentChunkConfig, VideoChunkConfig};
use lectern_core::{PageMap, Transcript};
use lectern_ingest::batch::{chunk_documents, with_threads, DocumentInput};
use lectern_ingest::document::chunker::{DocumentChunker, DocumentMetadata};
use lectern_ingest::document::extract_text;
use lectern_ingest::transcript::TranscriptChunker;

// ── CLI ─────────────────────────────────────────────────────────────

/// Content segmentation for documents and lecture transcripts.
#[derive(Parser, Debug)]
#[command(name = "lectern-chunk", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Chunk text or markdown documents.
    Document {
        /// Files to chunk (.txt, .md).
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Document options as a camelCase JSON object.
        #[arg(long)]
        options: Option<String>,

        /// JSON page map for a single pre-extracted text file.
        #[arg(long)]
        page_map: Option<PathBuf>,

        /// Worker threads (0 = one per core).
        #[arg(long, env = "LECTERN_THREADS", default_value_t = 0)]
        threads: usize,
    },
    /// Chunk a transcript JSON file.
    Transcript {
        path: PathBuf,

        /// Video options as a camelCase JSON object.
        #[arg(long)]
        options: Option<String>,

        /// JSON object copied into every chunk's metadata.
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Print the effective configuration.
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    load_dotenv();
    let cli = Cli::parse();
    let config = Config::from_env();
    config.log_summary();

    match cli.command {
        Command::Document {
            paths,
            options,
            page_map,
            threads,
        } => {
            let doc_config = DocumentChunkConfig::from_json_or(options.as_deref(), config.document)
                .context("invalid document options")?;
            run_document(paths, page_map, doc_config, threads)
        }
        Command::Transcript {
            path,
            options,
            metadata,
        } => {
            let video_config = VideoChunkConfig::from_json_or(options.as_deref(), config.video)
                .context("invalid video options")?;
            let metadata: Map<String, Value> = match metadata {
                Some(json) => {
                    serde_json::from_str(&json).context("--metadata must be a JSON object")?
                }
                None => Map::new(),
            };
            run_transcript(&path, video_config, &metadata)
        }
        Command::Config => {
            if let Err(e) = config.validate() {
                tracing::warn!(error = %e, "environment configuration is invalid");
            }
            println!("{}", serde_json::to_string_pretty(&config.summary())?);
            Ok(())
        }
    }
}

// ── Documents ───────────────────────────────────────────────────────

fn doc_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn load_document(path: &Path) -> Result<DocumentInput> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path.to_string_lossy();
    let doc = extract_text(&bytes, &filename)
        .with_context(|| format!("failed to extract {}", path.display()))?;
    let (text, page_map) = doc.with_page_map();

    Ok(DocumentInput {
        metadata: DocumentMetadata::new(doc_id(path)),
        text,
        page_map,
    })
}

fn load_with_page_map(path: &Path, map_path: &Path) -> Result<DocumentInput> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let map_json = std::fs::read_to_string(map_path)
        .with_context(|| format!("failed to read {}", map_path.display()))?;
    let page_map: PageMap = serde_json::from_str(&map_json)
        .with_context(|| format!("invalid page map {}", map_path.display()))?;

    Ok(DocumentInput {
        metadata: DocumentMetadata::new(doc_id(path)),
        text,
        page_map: Some(PageMap::from_ranges(page_map.ranges().to_vec())),
    })
}

fn run_document(
    paths: Vec<PathBuf>,
    page_map: Option<PathBuf>,
    config: DocumentChunkConfig,
    threads: usize,
) -> Result<()> {
    let inputs = match page_map {
        Some(map_path) => {
            if paths.len() != 1 {
                bail!("--page-map applies to exactly one document, got {}", paths.len());
            }
            vec![load_with_page_map(&paths[0], &map_path)?]
        }
        None => paths
            .iter()
            .map(|p| load_document(p))
            .collect::<Result<Vec<_>>>()?,
    };

    let chunker = DocumentChunker::new(config);
    let results = with_threads(threads, || chunk_documents(&inputs, &chunker))?;

    let total: usize = results.iter().map(Vec::len).sum();
    tracing::info!(documents = inputs.len(), chunks = total, "chunking complete");

    write_lines(results.iter().flatten())
}

// ── Transcripts ─────────────────────────────────────────────────────

fn run_transcript(
    path: &Path,
    config: VideoChunkConfig,
    metadata: &Map<String, Value>,
) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let transcript: Transcript = serde_json::from_str(&json)
        .with_context(|| format!("invalid transcript JSON in {}", path.display()))?;

    let chunks = TranscriptChunker::new(config).chunk(&transcript, metadata);
    tracing::info!(
        segments = transcript.segments.len(),
        chunks = chunks.len(),
        "transcript chunking complete"
    );
    write_lines(chunks.iter())
}

fn write_lines<'a, T, I>(items: I) -> Result<()>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for item in items {
        serde_json::to_writer(&mut out, item)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
