//! On-disk cache of extracted records, one JSON file per entry.
//!
//! A cache entry is trusted verbatim once present; there is no versioning or
//! expiry. Concurrent writers for the same name are last-writer-wins, which
//! is harmless because extraction is deterministic.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::Card;

/// Outcome of a cache probe.
///
/// Absence is an expected condition and falls back to fresh extraction; a
/// present but undecodable entry is a hard error so corruption is never
/// silently treated as absence.
#[derive(Debug)]
pub enum CacheLookup {
    /// A record was found and decoded.
    Hit(Card),
    /// No record exists for the name.
    Miss,
}

fn entry_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

/// Probe the cache for `name`.
pub fn load(dir: &Path, name: &str) -> Result<CacheLookup> {
    let path = entry_path(dir, name);
    let data = match fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CacheLookup::Miss),
        Err(e) => return Err(e.into()),
    };

    let card: Card = serde_json::from_str(&data)
        .map_err(|e| Error::CacheCorrupt(name.to_string(), e.to_string()))?;
    Ok(CacheLookup::Hit(card))
}

/// Persist a record, creating the cache directory if needed.
pub fn store(dir: &Path, card: &Card) -> Result<()> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string(card).map_err(|e| Error::Cache(e.to_string()))?;
    fs::write(entry_path(dir, &card.name), json)?;
    Ok(())
}
