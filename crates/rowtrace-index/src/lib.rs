//! # rowtrace-index
//!
//! Find business records by primary key across a directory of spreadsheet
//! files whose sheets disagree on column names and date encodings.
//!
//! ## Architecture
//!
//! - [`SchemaResolver`] picks each sheet's key and date column from ordered
//!   candidate lists.
//! - [`CacheBuilder`] walks the data root, opens every workbook and indexes
//!   each sheet by key into one immutable [`Snapshot`]. Unreadable files and
//!   sheets are skipped and recorded in the [`BuildReport`].
//! - [`LookupEngine`] scans a snapshot for a key and returns
//!   [`EnrichedMatch`]es with provenance and a normalized date.
//! - [`DateNormalizer`] turns any date cell into a fixed format or a
//!   sentinel, without ever failing.
//! - [`CacheManager`] owns the current snapshot: lazy first build, full
//!   rebuilds, atomic swap.
//!
//! ## Example
//!
//! ```no_run
//! use rowtrace_index::{CacheManager, Settings};
//!
//! let manager = CacheManager::new(Settings::default().with_root("data/"));
//! for m in manager.lookup("X1") {
//!     println!("{} / {}: {}", m.file_name, m.sheet_name, m.parsed_date);
//! }
//! manager.refresh();
//! ```

pub mod builder;
pub mod cache;
pub mod dates;
pub mod error;
pub mod lookup;
pub mod schema;
pub mod settings;
pub mod snapshot;
pub mod timeline;

// Re-exports
pub use builder::{CacheBuilder, ExcelOpener, SourceOpener};
pub use cache::CacheManager;
pub use dates::{DateNormalizer, NONE_SENTINEL, UNPARSEABLE_PREFIX};
pub use error::{IndexError, Result};
pub use lookup::{EnrichedMatch, LookupEngine};
pub use schema::{ResolvedSchema, SchemaResolver};
pub use settings::{DataSettings, DateSettings, SchemaSettings, Settings};
pub use snapshot::{
    BuildReport, BuildSummary, DataSource, IndexEntry, Record, Sheet, SheetIndex, SheetOutcome,
    SheetReport, Snapshot, SourceOutcome, SourceReport,
};
pub use timeline::Timeline;
