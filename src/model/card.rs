//! The assembled documentation record for one bulk data entry.

use serde::{Deserialize, Serialize};

/// One line of source text, held as an ordered sequence of cell strings.
pub type Row = Vec<String>;

/// Extracted documentation for a single bulk data entry.
///
/// Built once by the extraction pipeline, or restored verbatim from the
/// cache, and not modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Uppercase entry name, the unique cache key
    pub name: String,

    /// One-line summary from the entry heading
    pub short_description: String,

    /// Introductory paragraph below the heading
    pub long_description: String,

    /// Fixed-column format table; leading single-cell rows are section
    /// labels, the first full row is the header
    pub format: Vec<Row>,

    /// Describer/meaning table, first row is the header
    pub fields: Vec<Row>,

    /// 1-based page where the entry starts in the source document.
    /// Zero in records cached before this field existed.
    #[serde(default)]
    pub source_page: u32,
}

impl Card {
    /// An unpopulated record for `name`, handed back when extraction is
    /// abandoned.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_description: String::new(),
            long_description: String::new(),
            format: Vec::new(),
            fields: Vec::new(),
            source_page: 0,
        }
    }

    /// True when every content field carries data.
    ///
    /// Gates both rendering and cache persistence: incomplete records are
    /// never printed or written to disk.
    pub fn is_complete(&self) -> bool {
        !self.short_description.is_empty()
            && !self.long_description.is_empty()
            && !self.format.is_empty()
            && !self.fields.is_empty()
    }
}
