use super::{ExtractionError, PageContent};

fn decode(bytes: &[u8]) -> String {
    // Try UTF-8 first, fall back to lossy conversion
    String::from_utf8(bytes.to_vec())
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())
}

fn single_page(text: &str) -> Vec<PageContent> {
    vec![PageContent {
        page_number: 1,
        text: text.trim().to_string(),
    }]
}

/// Decode plain text. Form feed characters (`\x0C`), which text exports of
/// paginated documents use as page breaks, split the text into pages.
pub fn extract_plain(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let text = decode(bytes);
    if !text.contains('\x0C') {
        return Ok(single_page(&text));
    }

    // Blank pages keep their number so later pages stay aligned with the source.
    let pages = text
        .split('\x0C')
        .enumerate()
        .filter(|(_, page_text)| !page_text.trim().is_empty())
        .map(|(i, page_text)| PageContent {
            page_number: i as u32 + 1,
            text: page_text.trim().to_string(),
        })
        .collect();

    Ok(pages)
}

/// Decode markdown as a single page. Markup is left in place; the section
/// identifier works on the raw lines.
pub fn extract_markdown(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    Ok(single_page(&decode(bytes)))
}
