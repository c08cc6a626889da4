//! Error types for dataset loading and configuration.

use thiserror::Error;

/// Error type for the Castbook core.
#[derive(Debug, Error)]
pub enum Error {
    /// A dataset document could not be decoded.
    #[error("JSON error in {document}: {source}")]
    Json {
        /// Which document failed ("actors" or "movies")
        document: &'static str,
        /// Underlying decoder error
        #[source]
        source: serde_json::Error,
    },
    /// A file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file could not be decoded.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    /// The configuration could not be encoded.
    #[error("config encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),
    /// A configuration value is out of range.
    #[error("invalid value for '{field}': {message}")]
    InvalidConfig {
        /// Field name
        field: &'static str,
        /// Error message
        message: String,
    },
    /// Two movies share a title, which makes the title filter ambiguous.
    #[error("duplicate movie title: {0}")]
    DuplicateTitle(String),
}

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, Error>;
