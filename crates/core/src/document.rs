use serde::{Deserialize, Serialize};

/// Character range of one page (or slide) in a document's extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    /// 1-based page number.
    pub page_number: u32,
    /// First character offset of the page.
    pub start_char: usize,
    /// Last character offset of the page (inclusive for lookups).
    pub end_char: usize,
}

/// Ordered, non-overlapping page ranges for one document.
///
/// Built once during extraction and consumed read-only by the chunkers.
/// Flowing formats without fixed pages simply have no page map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageMap {
    ranges: Vec<PageRange>,
}

impl PageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from ranges, sorting them by start offset.
    pub fn from_ranges(mut ranges: Vec<PageRange>) -> Self {
        ranges.sort_by_key(|r| r.start_char);
        Self { ranges }
    }

    /// Append a page. Callers add pages in document order.
    pub fn push(&mut self, page_number: u32, start_char: usize, end_char: usize) {
        self.ranges.push(PageRange {
            page_number,
            start_char,
            end_char,
        });
    }

    pub fn ranges(&self) -> &[PageRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Page containing `position`.
    ///
    /// Positions past the last page resolve to the last page (extractors tend
    /// to under-count trailing whitespace). Positions in a gap between pages
    /// resolve to the page that follows the gap.
    pub fn find_page(&self, position: usize) -> Option<u32> {
        let last = self.ranges.last()?;
        if position > last.end_char {
            return Some(last.page_number);
        }
        let idx = self.ranges.partition_point(|r| r.end_char < position);
        self.ranges.get(idx).map(|r| r.page_number)
    }
}

/// Resolve the page for a character offset against an optional page map.
pub fn find_page(position: usize, page_map: Option<&PageMap>) -> Option<u32> {
    page_map.and_then(|map| map.find_page(position))
}
