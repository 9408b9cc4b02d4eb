//! Excel/XLSX/XLS workbook source using calamine.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Reader, Sheets};

use crate::error::{DataError, Result};
use crate::sources::{SheetTable, WorkbookSource};

/// Excel workbook data source
///
/// The workbook handle lives as long as the source; dropping the source
/// closes the file.
pub struct ExcelSource {
    /// Open workbook (format picked from the file extension)
    workbook: Sheets<BufReader<File>>,
    /// Sheet names cache
    sheet_names: Vec<String>,
}

impl ExcelSource {
    /// Open a workbook from a file path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();

        if !path.as_ref().exists() {
            return Err(DataError::FileNotFound(path_str));
        }

        let workbook = open_workbook_auto(path.as_ref())
            .map_err(|e| DataError::WorkbookOpen(format!("{}: {}", path_str, e)))?;

        let sheet_names = workbook.sheet_names();

        Ok(Self {
            workbook,
            sheet_names,
        })
    }
}

impl WorkbookSource for ExcelSource {
    fn sheet_names(&self) -> Vec<String> {
        self.sheet_names.clone()
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetTable> {
        if !self.sheet_names.iter().any(|name| name == sheet) {
            return Err(DataError::SheetNotFound(sheet.to_string()));
        }

        let range = self
            .workbook
            .worksheet_range(sheet)
            .map_err(|e| DataError::SheetRead {
                sheet: sheet.to_string(),
                reason: e.to_string(),
            })?;

        Ok(SheetTable::from_range(&range))
    }
}
