//! Error types for the qrg library.

use std::io;
use thiserror::Error;

/// Result type alias for qrg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while looking up entry documentation.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the guide, the catalog, or the cache.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The requested name is not a known bulk data entry.
    #[error("'{0}' is not a known bulk data entry")]
    UnknownCard(String),

    /// The entry is absent from (or last in) the table of contents.
    #[error("'{0}' not found within the documentation contents")]
    SectionNotFound(String),

    /// A zone marker is missing from the extracted page text.
    #[error("marker '{0}' not found in extracted page text")]
    MarkerNotFound(&'static str),

    /// Invalid page range requested from the source document.
    #[error("page range {start}..{end} is invalid (document has {pages} pages)")]
    PageRange { start: u32, end: u32, pages: u32 },

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// A cache entry exists but cannot be decoded.
    #[error("corrupt cache entry for '{0}': {1}")]
    CacheCorrupt(String, String),

    /// Error writing a record to the cache.
    #[error("cache error: {0}")]
    Cache(String),

    /// The DataTypes catalog is missing or malformed.
    #[error("catalog error: {0}")]
    Catalog(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownCard("CFOO".to_string());
        assert_eq!(err.to_string(), "'CFOO' is not a known bulk data entry");

        let err = Error::PageRange {
            start: 10,
            end: 5,
            pages: 20,
        };
        assert_eq!(
            err.to_string(),
            "page range 10..5 is invalid (document has 20 pages)"
        );

        let err = Error::MarkerNotFound("Remarks");
        assert!(err.to_string().contains("Remarks"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
