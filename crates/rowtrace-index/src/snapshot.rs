//! Immutable cache state.
//!
//! A [`Snapshot`] is produced in one pass by the builder and never mutated
//! afterwards. Lookups hold an `Arc<Snapshot>` and are unaffected by a
//! concurrent rebuild, which produces a fresh snapshot instead.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use rowtrace_data::CellValue;
use serde::Serialize;

use crate::dates::DateNormalizer;

/// One discovered workbook file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    /// Path as discovered under the data root
    pub path: PathBuf,
    /// File name used for provenance
    pub name: String,
}

/// One sheet of a data source, with its resolved columns
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    /// Column headers in sheet order
    pub headers: Vec<String>,
    /// Resolved key column, `None` when no candidate matched
    pub key_column: Option<String>,
    /// Resolved date column
    pub date_column: Option<String>,
}

impl Sheet {
    /// Position of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Position of the resolved date column
    pub fn date_index(&self) -> Option<usize> {
        self.date_column
            .as_deref()
            .and_then(|name| self.column_index(name))
    }
}

/// One row of a sheet; cells line up with [`Sheet::headers`]
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub cells: Vec<CellValue>,
}

impl Record {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Cell at a column position, `Empty` when out of range
    pub fn cell(&self, index: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells.get(index).unwrap_or(&EMPTY)
    }

    /// Cell under a named column of `sheet`
    pub fn get<'a>(&'a self, sheet: &Sheet, column: &str) -> Option<&'a CellValue> {
        sheet.column_index(column).map(|idx| self.cell(idx))
    }
}

/// Per-sheet map from normalized key text to the records sharing that key
///
/// Records keep their sheet order within a key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexEntry {
    records: HashMap<String, Vec<Record>>,
}

impl IndexEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record under an already-normalized key
    pub fn insert(&mut self, key: String, record: Record) {
        self.records.entry(key).or_default().push(record);
    }

    /// Records stored under `key`, empty when absent
    pub fn get(&self, key: &str) -> &[Record] {
        self.records.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.records.len()
    }

    /// Number of records across all keys
    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A (source, sheet, index) triple
#[derive(Debug, Clone)]
pub struct SheetIndex {
    pub source: Arc<DataSource>,
    pub sheet: Sheet,
    pub entry: IndexEntry,
}

/// Outcome of opening one workbook during a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    /// Workbook opened; see the per-sheet outcomes
    Opened,
    /// Workbook could not be opened and contributes nothing
    Skipped { reason: String },
}

/// Outcome of processing one sheet during a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetOutcome {
    /// Sheet indexed under its key column
    Indexed {
        key_column: String,
        date_column: Option<String>,
        records: usize,
        keys: usize,
    },
    /// No key candidate present; nothing from this sheet is reachable
    Unindexed,
    /// Sheet data could not be read
    Skipped { reason: String },
}

/// Per-sheet entry of a [`BuildReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetReport {
    pub name: String,
    pub outcome: SheetOutcome,
}

/// Per-file entry of a [`BuildReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub path: String,
    pub name: String,
    pub outcome: SourceOutcome,
    pub sheets: Vec<SheetReport>,
}

/// What happened to every file and sheet during one build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub sources: Vec<SourceReport>,
}

/// Counts derived from a [`BuildReport`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    pub sources_found: usize,
    pub sources_skipped: usize,
    pub sheets_indexed: usize,
    pub sheets_unindexed: usize,
    pub sheets_skipped: usize,
    pub records_indexed: usize,
}

impl BuildReport {
    pub fn summary(&self) -> BuildSummary {
        let mut summary = BuildSummary {
            sources_found: self.sources.len(),
            ..Default::default()
        };

        for source in &self.sources {
            if matches!(source.outcome, SourceOutcome::Skipped { .. }) {
                summary.sources_skipped += 1;
            }
            for sheet in &source.sheets {
                match &sheet.outcome {
                    SheetOutcome::Indexed { records, .. } => {
                        summary.sheets_indexed += 1;
                        summary.records_indexed += records;
                    }
                    SheetOutcome::Unindexed => summary.sheets_unindexed += 1,
                    SheetOutcome::Skipped { .. } => summary.sheets_skipped += 1,
                }
            }
        }

        summary
    }

    /// Check if any file or sheet was skipped
    pub fn has_failures(&self) -> bool {
        let summary = self.summary();
        summary.sources_skipped > 0 || summary.sheets_skipped > 0
    }
}

/// One complete, internally consistent build of the index
#[derive(Debug)]
pub struct Snapshot {
    generation: u64,
    normalizer: DateNormalizer,
    sheets: Vec<SheetIndex>,
    report: BuildReport,
}

impl Snapshot {
    pub fn new(
        generation: u64,
        normalizer: DateNormalizer,
        sheets: Vec<SheetIndex>,
        report: BuildReport,
    ) -> Self {
        Self {
            generation,
            normalizer,
            sheets,
            report,
        }
    }

    /// A snapshot covering no sources
    pub fn empty(generation: u64, normalizer: DateNormalizer) -> Self {
        Self::new(generation, normalizer, Vec::new(), BuildReport::default())
    }

    /// Build counter; each rebuild gets a higher number
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Date normalizer configured when this snapshot was built
    pub fn normalizer(&self) -> &DateNormalizer {
        &self.normalizer
    }

    /// Indexed sheets in file/sheet traversal order
    pub fn sheets(&self) -> &[SheetIndex] {
        &self.sheets
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Total records reachable by lookup
    pub fn record_count(&self) -> usize {
        self.sheets.iter().map(|s| s.entry.record_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_index_entry_keeps_row_order() {
        let mut entry = IndexEntry::new();
        entry.insert("X1".to_string(), Record::new(vec![text("X1"), text("first")]));
        entry.insert("X2".to_string(), Record::new(vec![text("X2"), text("other")]));
        entry.insert("X1".to_string(), Record::new(vec![text("X1"), text("second")]));

        let records = entry.get("X1");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].cell(1), &text("first"));
        assert_eq!(records[1].cell(1), &text("second"));
        assert_eq!(entry.key_count(), 2);
        assert_eq!(entry.record_count(), 3);
        assert!(entry.get("missing").is_empty());
    }

    #[test]
    fn test_record_lookup_by_column() {
        let sheet = Sheet {
            name: "S1".to_string(),
            headers: vec!["PKEY".to_string(), "DATE_TIME".to_string()],
            key_column: Some("PKEY".to_string()),
            date_column: Some("DATE_TIME".to_string()),
        };
        let record = Record::new(vec![text("X1")]);

        assert_eq!(sheet.date_index(), Some(1));
        assert_eq!(record.get(&sheet, "PKEY"), Some(&text("X1")));
        assert_eq!(record.get(&sheet, "DATE_TIME"), Some(&CellValue::Empty));
        assert_eq!(record.get(&sheet, "nope"), None);
    }

    #[test]
    fn test_report_summary() {
        let report = BuildReport {
            sources: vec![
                SourceReport {
                    path: "data/a.xlsx".to_string(),
                    name: "a.xlsx".to_string(),
                    outcome: SourceOutcome::Opened,
                    sheets: vec![
                        SheetReport {
                            name: "S1".to_string(),
                            outcome: SheetOutcome::Indexed {
                                key_column: "PKEY".to_string(),
                                date_column: None,
                                records: 4,
                                keys: 3,
                            },
                        },
                        SheetReport {
                            name: "S2".to_string(),
                            outcome: SheetOutcome::Unindexed,
                        },
                    ],
                },
                SourceReport {
                    path: "data/b.xlsx".to_string(),
                    name: "b.xlsx".to_string(),
                    outcome: SourceOutcome::Skipped {
                        reason: "corrupt".to_string(),
                    },
                    sheets: Vec::new(),
                },
            ],
        };

        let summary = report.summary();
        assert_eq!(summary.sources_found, 2);
        assert_eq!(summary.sources_skipped, 1);
        assert_eq!(summary.sheets_indexed, 1);
        assert_eq!(summary.sheets_unindexed, 1);
        assert_eq!(summary.records_indexed, 4);
        assert!(report.has_failures());
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::empty(3, DateNormalizer::default());
        assert_eq!(snapshot.generation(), 3);
        assert!(snapshot.sheets().is_empty());
        assert_eq!(snapshot.record_count(), 0);
        assert!(!snapshot.report().has_failures());
    }
}
