//! Schema resolution: which column is the key, which is the date.
//!
//! Matching is exact and case-sensitive. The first candidate present in the
//! header row wins.

use crate::settings::SchemaSettings;

/// Key and date columns picked for one sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSchema {
    pub key_column: Option<String>,
    pub date_column: Option<String>,
}

impl ResolvedSchema {
    /// Check if the sheet can be indexed
    pub fn is_indexable(&self) -> bool {
        self.key_column.is_some()
    }
}

/// Picks key/date columns from ordered candidate lists
#[derive(Debug, Clone, Default)]
pub struct SchemaResolver {
    key_candidates: Vec<String>,
    date_candidates: Vec<String>,
}

impl SchemaResolver {
    pub fn new(key_candidates: Vec<String>, date_candidates: Vec<String>) -> Self {
        Self {
            key_candidates,
            date_candidates,
        }
    }

    pub fn from_settings(settings: &SchemaSettings) -> Self {
        Self::new(settings.key_columns.clone(), settings.date_columns.clone())
    }

    /// Resolve both columns against a header row
    pub fn resolve(&self, headers: &[String]) -> ResolvedSchema {
        ResolvedSchema {
            key_column: first_present(headers, &self.key_candidates).map(str::to_string),
            date_column: first_present(headers, &self.date_candidates).map(str::to_string),
        }
    }
}

/// First candidate, in priority order, that appears in `headers`
pub fn first_present<'a>(headers: &[String], candidates: &'a [String]) -> Option<&'a str> {
    candidates
        .iter()
        .find(|candidate| headers.iter().any(|h| h == *candidate))
        .map(String::as_str)
}
