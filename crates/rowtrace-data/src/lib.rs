//! # rowtrace-data
//!
//! Spreadsheet access for rowtrace - discover workbook files under a data
//! root and read every sheet as typed rows.
//!
//! ## Features
//!
//! - **Discovery**: Recursive, deterministic search for `.xlsx`/`.xls` files
//! - **Excel Support**: Read whole sheets using `calamine`
//! - **Typed Cells**: [`CellValue`] keeps text, numbers, dates and blanks apart
//!
//! ## Example
//!
//! ```rust,ignore
//! use rowtrace_data::{discover_default, ExcelSource, WorkbookSource};
//!
//! for file in discover_default(Path::new("data/")) {
//!     let mut source = ExcelSource::open(&file.path)?;
//!     for sheet in source.sheet_names() {
//!         let table = source.read_sheet(&sheet)?;
//!         println!("{} / {}: {} rows", file.name, sheet, table.rows.len());
//!     }
//! }
//! ```

pub mod discovery;
pub mod error;
pub mod sources;
pub mod value;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-exports
pub use discovery::{discover, discover_default, DiscoveredFile, DEFAULT_EXTENSIONS};
pub use error::{DataError, Result};
pub use sources::{ExcelSource, SheetTable, WorkbookSource};
pub use value::CellValue;
