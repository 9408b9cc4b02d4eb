//! Error types for the index crate.
//!
//! Building and querying the index never fail past their own boundary;
//! these errors only surface while loading configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for index configuration operations
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors raised outside the build/lookup path
#[derive(Debug, Error)]
pub enum IndexError {
    /// Configuration file could not be read
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::Settings`]
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
