//! Key lookup across every indexed sheet of a snapshot.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::dates::NONE_SENTINEL;
use crate::snapshot::{Record, SheetIndex, Snapshot};

/// One matching record with its provenance and normalized date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedMatch {
    /// File name of the source workbook
    pub file_name: String,
    /// Full path of the source workbook
    pub file_path: String,
    pub sheet_name: String,
    /// Normalized date, or one of the date sentinels
    pub parsed_date: String,
    /// (column, text) pairs in sheet column order
    pub fields: Vec<(String, String)>,
}

impl EnrichedMatch {
    /// Text of a named field
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

const PROVENANCE_KEYS: [&str; 4] = [
    "00_file_name",
    "00_file_path",
    "00_sheet_name",
    "00_parsed_date",
];

/// Serialized as one flat object: provenance keys first, then the columns
///
/// A column named like a provenance key is emitted with the first free
/// `.N` suffix so every key in the object is unique.
impl Serialize for EnrichedMatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let provenance = [
            &self.file_name,
            &self.file_path,
            &self.sheet_name,
            &self.parsed_date,
        ];

        let mut map = serializer.serialize_map(Some(self.fields.len() + 4))?;
        for (key, value) in PROVENANCE_KEYS.iter().zip(provenance) {
            map.serialize_entry(key, value)?;
        }
        for (column, value) in &self.fields {
            if PROVENANCE_KEYS.contains(&column.as_str()) {
                map.serialize_entry(&self.free_column_name(column), value)?;
            } else {
                map.serialize_entry(column, value)?;
            }
        }
        map.end()
    }
}

impl EnrichedMatch {
    fn free_column_name(&self, column: &str) -> String {
        (1..)
            .map(|n| format!("{}.{}", column, n))
            .find(|candidate| {
                !PROVENANCE_KEYS.contains(&candidate.as_str())
                    && !self.fields.iter().any(|(name, _)| name == candidate)
            })
            .unwrap_or_else(|| column.to_string())
    }
}

/// Scans a snapshot for a key
pub struct LookupEngine;

impl LookupEngine {
    /// Every record whose key equals `key`, in file/sheet traversal order
    ///
    /// The key is compared as trimmed text. Duplicate keys across files are
    /// all returned; an unknown key gives an empty vector.
    pub fn lookup(snapshot: &Snapshot, key: &str) -> Vec<EnrichedMatch> {
        let key = key.trim();
        if key.is_empty() {
            return Vec::new();
        }

        let mut matches = Vec::new();
        for sheet_index in snapshot.sheets() {
            for record in sheet_index.entry.get(key) {
                matches.push(Self::enrich(snapshot, sheet_index, record));
            }
        }
        matches
    }

    fn enrich(snapshot: &Snapshot, sheet_index: &SheetIndex, record: &Record) -> EnrichedMatch {
        let sheet = &sheet_index.sheet;

        let parsed_date = match sheet.date_index() {
            Some(idx) => snapshot.normalizer().normalize(record.cell(idx)),
            None => NONE_SENTINEL.to_string(),
        };

        let fields = sheet
            .headers
            .iter()
            .enumerate()
            .map(|(idx, header)| (header.clone(), record.cell(idx).to_text()))
            .collect();

        EnrichedMatch {
            file_name: sheet_index.source.name.clone(),
            file_path: sheet_index.source.path.display().to_string(),
            sheet_name: sheet.name.clone(),
            parsed_date,
            fields,
        }
    }
}
