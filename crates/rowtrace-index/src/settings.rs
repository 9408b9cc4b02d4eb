//! Configuration Settings
//!
//! Settings are read from `rowtrace.toml`:
//!
//! ```toml
//! [data]
//! root = "data/"
//! extensions = ["xlsx", "xls"]
//!
//! [schema]
//! key_columns = ["appearance_id", "PKEY"]
//! date_columns = ["date", "DATE_TIME"]
//!
//! [dates]
//! output_format = "%Y-%m-%d"
//! ```
//!
//! Every table is optional; missing values fall back to the defaults above.
//! Settings are consumed at build time, so changes take effect on the next
//! refresh.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Where data files live
    pub data: DataSettings,
    /// Column name candidates
    pub schema: SchemaSettings,
    /// Date output settings
    pub dates: DateSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| IndexError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Same settings with a different data root
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.data.root = root.into();
        self
    }
}

/// Data root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Root directory searched recursively for workbooks
    pub root: PathBuf,
    /// Recognized file extensions, without the dot
    pub extensions: Vec<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data/"),
            extensions: rowtrace_data::DEFAULT_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Ordered column-name candidates; earlier entries win
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSettings {
    /// Candidate names for the primary key column
    pub key_columns: Vec<String>,
    /// Candidate names for the date column
    pub date_columns: Vec<String>,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self {
            key_columns: vec!["appearance_id".to_string(), "PKEY".to_string()],
            date_columns: vec!["date".to_string(), "DATE_TIME".to_string()],
        }
    }
}

/// Date output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateSettings {
    /// chrono `strftime` format for normalized dates
    pub output_format: String,
}

impl Default for DateSettings {
    fn default() -> Self {
        Self {
            output_format: "%Y-%m-%d".to_string(),
        }
    }
}
