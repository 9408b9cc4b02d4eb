//! Header-plus-rows view of a single sheet.

use std::collections::HashMap;

use calamine::{Data, Range};

use crate::value::CellValue;

/// One sheet's contents: column headers and typed data rows
///
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetTable {
    /// Column headers in sheet order, unique within the sheet
    pub headers: Vec<String>,
    /// Data rows (header row excluded)
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    /// Build a table from raw rows, treating the first row as the header
    ///
    /// Blank headers become `Unnamed: <index>` and repeated headers get a
    /// `.1`, `.2`, ... suffix. Short rows are padded with empty cells and
    /// rows with no content at all are dropped.
    pub fn from_rows(mut raw: Vec<Vec<CellValue>>) -> Self {
        if raw.is_empty() {
            return Self::default();
        }

        let header_cells = raw.remove(0);
        let width = raw
            .iter()
            .map(|row| row.len())
            .chain(std::iter::once(header_cells.len()))
            .max()
            .unwrap_or(0);

        let headers = Self::make_headers(&header_cells, width);

        let rows = raw
            .into_iter()
            .filter(|row| row.iter().any(|cell| !matches!(cell, CellValue::Empty)))
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Self { headers, rows }
    }

    /// Build a table from a calamine range
    pub fn from_range(range: &Range<Data>) -> Self {
        let raw = range
            .rows()
            .map(|row| row.iter().map(CellValue::from).collect())
            .collect();
        Self::from_rows(raw)
    }

    /// Position of a column by exact header name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Check if the sheet has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn make_headers(cells: &[CellValue], width: usize) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut headers = Vec::with_capacity(width);

        for idx in 0..width {
            let base = match cells.get(idx) {
                Some(cell) if !matches!(cell, CellValue::Empty) => cell.to_text(),
                _ => String::new(),
            };
            let base = if base.trim().is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                base
            };

            let header = match seen.get_mut(&base) {
                Some(count) => {
                    *count += 1;
                    format!("{}.{}", base, count)
                }
                None => {
                    seen.insert(base.clone(), 0);
                    base
                }
            };
            headers.push(header);
        }

        headers
    }
}
