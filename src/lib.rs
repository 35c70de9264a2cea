//! qrg - bulk data entry documentation from the MSC Nastran Quick Reference
//! Guide.
//!
//! Looks up one bulk data entry by name, extracts its documentation section
//! from the guide PDF, reshapes the format and describer tables, and caches
//! the result as JSON so the PDF is only opened on a cache miss.
//!
//! # Example
//!
//! ```no_run
//! use qrg::{lookup, Config};
//!
//! let config = Config::new().with_pdf_path("MSC_Nastran_2022.4_Quick_Reference_Guide.pdf");
//! let card = lookup("cbush", &config)?;
//! println!("{}", qrg::render(&card, &config.base_url));
//! # Ok::<(), qrg::Error>(())
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod link;
pub mod model;
pub mod render;
pub mod source;

pub use cache::CacheLookup;
pub use config::Config;
pub use error::{Error, Result};
pub use extract::Extractor;
pub use model::{Card, Row};
pub use render::render;
pub use source::{DocumentSource, PdfSource, TocEntry};

/// Look up the documentation record for a bulk data entry.
///
/// The name is case-insensitive. Unknown names fail before the guide is
/// touched; known names are served from the cache when possible, otherwise
/// extracted from the PDF and, if complete, cached for next time.
pub fn lookup(name: &str, config: &Config) -> Result<Card> {
    let name = name.to_uppercase();

    let known = catalog::load_cards(&config.datatypes_path)?;
    if !known.contains(&name) {
        return Err(Error::UnknownCard(name));
    }

    if !config.refresh {
        if let CacheLookup::Hit(card) = cache::load(&config.cache_dir, &name)? {
            log::debug!("'{name}' served from cache");
            return Ok(card);
        }
    }

    let source = PdfSource::open(&config.pdf_path)?;
    let card = Extractor::new(&source).lookup(&name)?;

    if card.is_complete() {
        cache::store(&config.cache_dir, &card)?;
    }
    Ok(card)
}
