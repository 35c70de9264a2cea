//! Source document boundary.
//!
//! The extraction pipeline only needs two things from the guide: a table of
//! contents mapping section labels to pages, and per-page text blocks with
//! enough geometry to restore reading order. Everything behind that boundary
//! is an implementation detail of [`PdfSource`].

mod pdf;

pub use pdf::PdfSource;

use crate::error::Result;

/// One table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Nesting level, 1 for top-level entries
    pub level: u8,
    /// Section label (the entry name for bulk data sections)
    pub title: String,
    /// 1-based page the section starts on
    pub page: u32,
}

impl TocEntry {
    /// Create a new entry.
    pub fn new(level: u8, title: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            title: title.into(),
            page,
        }
    }
}

/// A line of text inside a block, as emitted by the source document.
#[derive(Debug, Clone, Default)]
pub struct BlockLine {
    /// Text spans in emission order
    pub spans: Vec<String>,
}

impl BlockLine {
    /// Create a line from span strings.
    pub fn new<S: Into<String>>(spans: impl IntoIterator<Item = S>) -> Self {
        Self {
            spans: spans.into_iter().map(Into::into).collect(),
        }
    }
}

/// A positioned block of text on one page.
#[derive(Debug, Clone)]
pub struct PageBlock {
    /// Vertical offset of the block's top edge, measured from the page top
    pub top: f32,
    /// Lines in the block, top to bottom
    pub lines: Vec<BlockLine>,
}

impl PageBlock {
    /// Create a block.
    pub fn new(top: f32, lines: Vec<BlockLine>) -> Self {
        Self { top, lines }
    }
}

/// Read access to a paginated document with a table of contents.
pub trait DocumentSource {
    /// Total number of pages.
    fn page_count(&self) -> u32;

    /// Table of contents, in document order.
    fn toc(&self) -> Result<Vec<TocEntry>>;

    /// Text blocks for a 0-based page index, in emission order.
    fn page_blocks(&self, page_index: u32) -> Result<Vec<PageBlock>>;
}
