//! Table configuration, loaded from TOML.
//!
//! Every key is optional; a missing key takes its default.
//!
//! ```toml
//! page_size = 20
//! search_debounce_ms = 200
//! resize_debounce_ms = 150
//! reveal_delay_ms = 1000
//! actors_url = "/data/actors.json"
//! movies_url = "/data/movies.json"
//! cameo_min_width = 1350
//!
//! [breakpoints]
//! tablet_min = 768
//! desktop_min = 1024
//!
//! [default_sort]
//! key = "movies"
//! direction = "desc"
//! ```

use crate::error::{Error, Result};
use crate::page::DEFAULT_PAGE_SIZE;
use crate::sort::{SortKey, SortSpec};
use crate::viewport::Breakpoints;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for one table instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows per page
    pub page_size: usize,
    /// Quiet interval before search text settles
    pub search_debounce_ms: u64,
    /// Quiet interval before a resize is classified
    pub resize_debounce_ms: u64,
    /// Delay between dataset arrival and revealing the table
    pub reveal_delay_ms: u64,
    /// Location of the actors document
    pub actors_url: String,
    /// Location of the movies document
    pub movies_url: String,
    /// Viewport width thresholds
    pub breakpoints: Breakpoints,
    /// Desktop widths above this show the side cameo
    pub cameo_min_width: u32,
    /// Sort applied when the table opens
    pub default_sort: SortSpec,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: 200,
            resize_debounce_ms: 150,
            reveal_delay_ms: 1000,
            actors_url: "/data/actors.json".to_string(),
            movies_url: "/data/movies.json".to_string(),
            breakpoints: Breakpoints::default(),
            cameo_min_width: 1350,
            default_sort: SortSpec::descending(SortKey::Movies),
        }
    }
}

impl TableConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is out of range.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails [`Self::from_toml`].
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Serialize to a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigEncode`] if the serializer rejects a value.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::InvalidConfig {
                field: "page_size",
                message: "must be at least 1".to_string(),
            });
        }
        if self.breakpoints.tablet_min >= self.breakpoints.desktop_min {
            return Err(Error::InvalidConfig {
                field: "breakpoints",
                message: format!(
                    "tablet_min ({}) must be below desktop_min ({})",
                    self.breakpoints.tablet_min, self.breakpoints.desktop_min
                ),
            });
        }
        Ok(())
    }

    /// Search quiet interval.
    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Resize quiet interval.
    #[must_use]
    pub const fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Reveal delay.
    #[must_use]
    pub const fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}
