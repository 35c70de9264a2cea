//! Documentation extraction pipeline.
//!
//! Extraction runs in three stages over a [`DocumentSource`]: the reader
//! flattens the entry's pages into rows, the zone locator finds the marker
//! rows that delimit the section's parts, and the table builders shape the
//! zones into the record's two tables.

mod reader;
mod tables;
mod zones;

pub use zones::{PageRange, ZoneBounds, DESCRIBER_MARKER, EXAMPLE_MARKER, REMARKS_MARKER};

use crate::error::{Error, Result};
use crate::model::Card;
use crate::source::DocumentSource;

/// Row index where the format zone starts: heading, long description and the
/// "Format:" label occupy the rows before it.
const DATA_START: usize = 3;

/// Extracts one entry's documentation from a source document.
pub struct Extractor<'a> {
    source: &'a dyn DocumentSource,
}

impl<'a> Extractor<'a> {
    /// Create an extractor over `source`.
    pub fn new(source: &'a dyn DocumentSource) -> Self {
        Self { source }
    }

    /// Extract the record for `name`, failing on any layout surprise.
    pub fn extract(&self, name: &str) -> Result<Card> {
        let toc = self.source.toc()?;
        let range = zones::resolve_page_range(&toc, name)?;
        log::debug!(
            "'{}' spans pages {}..{} of the guide",
            name,
            range.start + 1,
            range.end + 1
        );

        let rows = reader::read(self.source, name, range.start, range.end)?;
        let bounds = zones::locate(&rows)?;
        if bounds.example < DATA_START {
            return Err(Error::MarkerNotFound(EXAMPLE_MARKER));
        }

        let short_description = rows[0].get(1).cloned().unwrap_or_default();
        let long_description = rows[1].concat();
        let format = tables::build_format(&rows[DATA_START..bounds.example]);
        let fields = tables::build_describer(&rows[bounds.describer..bounds.remarks]);

        Ok(Card {
            name: name.to_string(),
            short_description,
            long_description,
            format,
            fields,
            source_page: range.source_page,
        })
    }

    /// Extract the record for `name`, degrading layout surprises to an empty
    /// record.
    ///
    /// Entries missing from the contents or laid out without the expected
    /// markers are real conditions in the guide, not caller mistakes, so they
    /// produce a diagnostic and an empty record rather than an error. I/O and
    /// parse failures still propagate.
    pub fn lookup(&self, name: &str) -> Result<Card> {
        match self.extract(name) {
            Ok(card) => Ok(card),
            Err(Error::SectionNotFound(_)) => {
                log::warn!("'{name}' has no locatable section in the guide");
                Ok(Card::empty(name))
            }
            Err(Error::MarkerNotFound(marker)) => {
                log::warn!("'{name}' section lacks the '{marker}' marker");
                Ok(Card::empty(name))
            }
            Err(e) => Err(e),
        }
    }
}
