//! Recursive discovery of spreadsheet files under a data root.

use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use tracing::{debug, warn};

/// Spreadsheet extensions recognized by default
pub const DEFAULT_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// A spreadsheet file found under the data root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DiscoveredFile {
    /// Full path as found by the walk
    pub path: PathBuf,
    /// File name without directories, used for provenance
    pub name: String,
}

impl DiscoveredFile {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }
}

/// Find every file under `root` whose extension is in `extensions`
///
/// Extension matching is case-sensitive. Results are sorted by path so
/// downstream provenance ordering is reproducible. A missing root yields
/// an empty list.
pub fn discover(root: &Path, extensions: &[String]) -> Vec<DiscoveredFile> {
    if !root.is_dir() {
        debug!(root = %root.display(), "data root missing, no sources");
        return Vec::new();
    }

    let escaped_root = Pattern::escape(&root.display().to_string());
    let mut paths: Vec<PathBuf> = Vec::new();

    for ext in extensions {
        let pattern = format!("{}/**/*.{}", escaped_root, Pattern::escape(ext));
        let entries = match glob(&pattern) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "invalid discovery pattern");
                continue;
            }
        };

        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "could not read directory entry"),
            }
        }
    }

    paths.sort();
    paths.dedup();

    let files: Vec<DiscoveredFile> = paths.into_iter().map(DiscoveredFile::new).collect();
    debug!(root = %root.display(), count = files.len(), "discovered data files");
    files
}

/// Discover files using [`DEFAULT_EXTENSIONS`]
pub fn discover_default(root: &Path) -> Vec<DiscoveredFile> {
    let extensions: Vec<String> = DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect();
    discover(root, &extensions)
}
