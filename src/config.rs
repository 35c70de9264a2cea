//! Lookup configuration.
//!
//! Every entry point takes a [`Config`] explicitly; there is no module-level
//! state. Defaults match the conventional layout: guide and catalog colocated
//! with the program, cache under the platform cache directory.

use std::path::PathBuf;

use crate::link::DEFAULT_BASE_URL;

/// Default filename of the Quick Reference Guide PDF.
pub const DEFAULT_PDF: &str = "MSC_Nastran_2022.4_Quick_Reference_Guide.pdf";

/// Default filename of the DataTypes metadata file.
pub const DEFAULT_DATATYPES: &str = "DataType_v20224.xml";

/// Configuration for a documentation lookup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the Quick Reference Guide PDF
    pub pdf_path: PathBuf,

    /// Path to the DataTypes XML listing valid entry names
    pub datatypes_path: PathBuf,

    /// Directory holding one cached JSON record per entry
    pub cache_dir: PathBuf,

    /// Base URL of the hosted documentation (display only)
    pub base_url: String,

    /// Command used to open the PDF viewer
    pub viewer: String,

    /// Ignore cached records and re-extract
    pub refresh: bool,
}

impl Config {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the guide PDF path.
    pub fn with_pdf_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pdf_path = path.into();
        self
    }

    /// Set the DataTypes XML path.
    pub fn with_datatypes_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.datatypes_path = path.into();
        self
    }

    /// Set the cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Set the documentation base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the viewer command.
    pub fn with_viewer(mut self, viewer: impl Into<String>) -> Self {
        self.viewer = viewer.into();
        self
    }

    /// Force re-extraction even when a cached record exists.
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pdf_path: PathBuf::from(DEFAULT_PDF),
            datatypes_path: PathBuf::from(DEFAULT_DATATYPES),
            cache_dir: default_cache_dir(),
            base_url: DEFAULT_BASE_URL.to_string(),
            viewer: default_viewer().to_string(),
            refresh: false,
        }
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("qrg"))
        .unwrap_or_else(|| PathBuf::from("BULK"))
}

fn default_viewer() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = Config::new()
            .with_pdf_path("guide.pdf")
            .with_cache_dir("/tmp/qrg-cache")
            .with_refresh(true);

        assert_eq!(config.pdf_path, PathBuf::from("guide.pdf"));
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/qrg-cache"));
        assert!(config.refresh);
        assert_eq!(config.datatypes_path, PathBuf::from(DEFAULT_DATATYPES));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.refresh);
        assert!(!config.viewer.is_empty());
    }
}
