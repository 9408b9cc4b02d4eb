//! rowtrace CLI - Command-line interface library
//!
//! This library provides the CLI functionality for rowtrace:
//! - Lookup: Find every record with a key across all data files
//! - Timeline: The same records grouped by date, file and sheet
//! - Stats: Which files and sheets were indexed or skipped
//!
//! # Binary Usage
//!
//! ```bash
//! # Find a record
//! rowtrace --root data/ lookup X1
//!
//! # Machine-readable output
//! rowtrace lookup X1 --format json
//!
//! # Timeline for the web front end
//! rowtrace timeline X1
//!
//! # Check for unreadable files
//! rowtrace stats
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{init_tracing, load_settings, lookup_command, stats_command, timeline_command};
pub use app::{run_cli, OutputFormat};
