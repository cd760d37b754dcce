pub mod chunker;
mod text;

use lectern_core::PageMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Separator placed between pages when they are joined into one text.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// A page of extracted text with metadata.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number. Text without page breaks is a single page 1.
    pub page_number: u32,
    /// The extracted text content.
    pub text: String,
}

/// Result of extracting text from a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Original filename.
    pub filename: String,
    /// File type: "txt", "md"
    pub file_type: String,
    /// Extracted pages with text and metadata.
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// Get all text concatenated.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(PAGE_SEPARATOR)
    }

    /// Full text plus the character range each page occupies in it.
    ///
    /// Text that is only page 1 carries no pagination and gets `None` for the
    /// map. A lone later page (blank pages before it were dropped) keeps its
    /// number.
    pub fn with_page_map(&self) -> (String, Option<PageMap>) {
        let text = self.full_text();
        if self.pages.iter().all(|p| p.page_number == 1) {
            return (text, None);
        }

        let separator_len = PAGE_SEPARATOR.chars().count();
        let mut map = PageMap::new();
        let mut offset = 0usize;
        for page in &self.pages {
            let len = page.text.chars().count();
            map.push(page.page_number, offset, (offset + len).saturating_sub(1));
            offset += len + separator_len;
        }
        (text, Some(map))
    }
}

/// Extract text from file bytes based on file type.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<ExtractedDocument, ExtractionError> {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    let file_type = ext.as_str();

    let pages = match file_type {
        "txt" | "text" => text::extract_plain(bytes)?,
        "md" | "markdown" => text::extract_markdown(bytes)?,
        other => return Err(ExtractionError::UnsupportedType(other.to_string())),
    };

    Ok(ExtractedDocument {
        filename: filename.to_string(),
        file_type: file_type.to_string(),
        pages,
    })
}
