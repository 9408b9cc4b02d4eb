//! Workbook source implementations.
//!
//! A source yields its sheet names and, per sheet, a header row plus typed
//! data rows. The index builder only talks to the [`WorkbookSource`] trait.

pub mod excel;
pub mod table;

pub use excel::ExcelSource;
pub use table::SheetTable;

use crate::error::Result;

/// Trait for multi-sheet tabular sources
pub trait WorkbookSource {
    /// List the sheets in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Read a whole sheet as a header row plus data rows
    ///
    /// # Arguments
    /// * `sheet` - Sheet name as returned by [`WorkbookSource::sheet_names`]
    fn read_sheet(&mut self, sheet: &str) -> Result<SheetTable>;
}
