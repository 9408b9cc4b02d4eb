//! Snapshot construction.
//!
//! The build is a partial-failure-tolerant fold over discovered files: a
//! file that cannot be opened or a sheet that cannot be read is recorded in
//! the [`BuildReport`] and skipped, and the build moves on. [`CacheBuilder::build`]
//! always returns a snapshot.

use std::path::Path;
use std::sync::Arc;

use rowtrace_data::{discover, DiscoveredFile, ExcelSource, SheetTable, WorkbookSource};
use tracing::{debug, info, warn};

use crate::dates::DateNormalizer;
use crate::schema::SchemaResolver;
use crate::settings::Settings;
use crate::snapshot::{
    BuildReport, DataSource, IndexEntry, Record, Sheet, SheetIndex, SheetOutcome, SheetReport,
    Snapshot, SourceOutcome, SourceReport,
};

/// Opens a discovered file as a workbook
pub trait SourceOpener: Send + Sync {
    fn open(&self, path: &Path) -> rowtrace_data::Result<Box<dyn WorkbookSource>>;
}

/// Opens files with calamine
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelOpener;

impl SourceOpener for ExcelOpener {
    fn open(&self, path: &Path) -> rowtrace_data::Result<Box<dyn WorkbookSource>> {
        Ok(Box::new(ExcelSource::open(path)?))
    }
}

/// Builds snapshots from the configured data root
pub struct CacheBuilder {
    settings: Arc<Settings>,
    resolver: SchemaResolver,
    opener: Arc<dyn SourceOpener>,
}

impl CacheBuilder {
    /// Builder reading workbooks with [`ExcelOpener`]
    pub fn new(settings: Arc<Settings>) -> Self {
        Self::with_opener(settings, Arc::new(ExcelOpener))
    }

    pub fn with_opener(settings: Arc<Settings>, opener: Arc<dyn SourceOpener>) -> Self {
        let resolver = SchemaResolver::from_settings(&settings.schema);
        Self {
            settings,
            resolver,
            opener,
        }
    }

    /// Discover, open and index every workbook under the data root
    pub fn build(&self, generation: u64) -> Snapshot {
        let normalizer = DateNormalizer::new(self.settings.dates.output_format.clone());
        let files = discover(&self.settings.data.root, &self.settings.data.extensions);

        let mut sheets = Vec::new();
        let mut report = BuildReport::default();

        for file in &files {
            let (source_report, source_sheets) = self.build_source(file);
            report.sources.push(source_report);
            sheets.extend(source_sheets);
        }

        let summary = report.summary();
        info!(
            generation,
            root = %self.settings.data.root.display(),
            sources = summary.sources_found,
            sources_skipped = summary.sources_skipped,
            sheets_indexed = summary.sheets_indexed,
            sheets_unindexed = summary.sheets_unindexed,
            sheets_skipped = summary.sheets_skipped,
            records = summary.records_indexed,
            "index built"
        );

        Snapshot::new(generation, normalizer, sheets, report)
    }

    /// Process one file; the workbook is closed before returning
    fn build_source(&self, file: &DiscoveredFile) -> (SourceReport, Vec<SheetIndex>) {
        let mut report = SourceReport {
            path: file.path.display().to_string(),
            name: file.name.clone(),
            outcome: SourceOutcome::Opened,
            sheets: Vec::new(),
        };

        let mut workbook = match self.opener.open(&file.path) {
            Ok(workbook) => workbook,
            Err(e) => {
                warn!(path = %file.path.display(), error = %e, "skipping unreadable file");
                report.outcome = SourceOutcome::Skipped {
                    reason: e.to_string(),
                };
                return (report, Vec::new());
            }
        };

        let source = Arc::new(DataSource {
            path: file.path.clone(),
            name: file.name.clone(),
        });

        let mut indexed = Vec::new();
        for sheet_name in workbook.sheet_names() {
            let outcome = match workbook.read_sheet(&sheet_name) {
                Ok(table) => {
                    let (sheet_index, outcome) = self.index_sheet(&source, &sheet_name, table);
                    indexed.push(sheet_index);
                    outcome
                }
                Err(e) => {
                    warn!(
                        path = %file.path.display(),
                        sheet = %sheet_name,
                        error = %e,
                        "skipping unreadable sheet"
                    );
                    SheetOutcome::Skipped {
                        reason: e.to_string(),
                    }
                }
            };
            report.sheets.push(SheetReport {
                name: sheet_name,
                outcome,
            });
        }

        (report, indexed)
    }

    /// Resolve columns and index the rows of one sheet
    ///
    /// A sheet without a key column yields an empty index entry. Rows whose
    /// key cell is blank are not indexed.
    pub fn index_sheet(
        &self,
        source: &Arc<DataSource>,
        sheet_name: &str,
        table: SheetTable,
    ) -> (SheetIndex, SheetOutcome) {
        let schema = self.resolver.resolve(&table.headers);
        let key_index = schema
            .key_column
            .as_deref()
            .and_then(|key| table.column_index(key));

        let mut entry = IndexEntry::new();
        if let Some(key_index) = key_index {
            for row in table.rows {
                let Some(key) = row.get(key_index).and_then(|cell| cell.key_text()) else {
                    continue;
                };
                entry.insert(key, Record::new(row));
            }
        }

        let outcome = match &schema.key_column {
            Some(key_column) => SheetOutcome::Indexed {
                key_column: key_column.clone(),
                date_column: schema.date_column.clone(),
                records: entry.record_count(),
                keys: entry.key_count(),
            },
            None => {
                debug!(
                    path = %source.path.display(),
                    sheet = %sheet_name,
                    "no key column, sheet not indexed"
                );
                SheetOutcome::Unindexed
            }
        };

        let sheet = Sheet {
            name: sheet_name.to_string(),
            headers: table.headers,
            key_column: schema.key_column,
            date_column: schema.date_column,
        };

        (
            SheetIndex {
                source: Arc::clone(source),
                sheet,
                entry,
            },
            outcome,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowtrace_data::CellValue;
    use std::path::PathBuf;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn builder() -> CacheBuilder {
        CacheBuilder::new(Arc::new(Settings::default()))
    }

    fn source() -> Arc<DataSource> {
        Arc::new(DataSource {
            path: PathBuf::from("data/A.xlsx"),
            name: "A.xlsx".to_string(),
        })
    }

    #[test]
    fn test_index_sheet_groups_rows_by_key() {
        let table = SheetTable::from_rows(vec![
            vec![text("PKEY"), text("DATE_TIME"), text("note")],
            vec![text("X1"), text("20240115"), text("a")],
            vec![text("X2"), text("20240116"), text("b")],
            vec![text("X1"), text("20240117"), text("c")],
            vec![CellValue::Empty, text("20240118"), text("orphan")],
        ]);

        let (index, outcome) = builder().index_sheet(&source(), "S1", table);

        assert_eq!(index.sheet.key_column.as_deref(), Some("PKEY"));
        assert_eq!(index.sheet.date_column.as_deref(), Some("DATE_TIME"));
        assert_eq!(index.entry.get("X1").len(), 2);
        assert_eq!(index.entry.get("X2").len(), 1);
        assert_eq!(
            outcome,
            SheetOutcome::Indexed {
                key_column: "PKEY".to_string(),
                date_column: Some("DATE_TIME".to_string()),
                records: 3,
                keys: 2,
            }
        );
    }

    #[test]
    fn test_numeric_keys_are_indexed_as_text() {
        let table = SheetTable::from_rows(vec![
            vec![text("appearance_id")],
            vec![CellValue::Float(1001.0)],
            vec![CellValue::Int(1002)],
        ]);

        let (index, _) = builder().index_sheet(&source(), "S1", table);

        assert!(index.entry.contains_key("1001"));
        assert!(index.entry.contains_key("1002"));
    }

    #[test]
    fn test_sheet_without_key_column() {
        let table = SheetTable::from_rows(vec![
            vec![text("id"), text("date")],
            vec![text("X1"), text("2024-01-01")],
        ]);

        let (index, outcome) = builder().index_sheet(&source(), "Other", table);

        assert_eq!(outcome, SheetOutcome::Unindexed);
        assert!(index.entry.is_empty());
        assert_eq!(index.sheet.key_column, None);
        assert_eq!(index.sheet.date_column.as_deref(), Some("date"));
    }

    #[test]
    fn test_build_missing_root() {
        let settings = Settings::default().with_root("/nonexistent/rowtrace/root");
        let snapshot = CacheBuilder::new(Arc::new(settings)).build(1);

        assert_eq!(snapshot.generation(), 1);
        assert!(snapshot.sheets().is_empty());
        assert_eq!(snapshot.report().summary().sources_found, 0);
    }
}
