//! Timeline view of lookup results, grouped by date, file and sheet.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::lookup::EnrichedMatch;

/// sheet name -> matches
pub type SheetGroup = BTreeMap<String, Vec<EnrichedMatch>>;

/// file path -> sheets
pub type FileGroup = BTreeMap<String, SheetGroup>;

/// Matches grouped as date -> file path -> sheet -> matches
///
/// Files are keyed by full path since discovery is recursive and two
/// directories may hold workbooks with the same name.
///
/// Dates sort lexically, which is chronological for the default
/// `%Y-%m-%d` output format. Sentinel dates sort after real ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub matches: BTreeMap<String, FileGroup>,
}

impl Timeline {
    pub fn from_matches(matches: Vec<EnrichedMatch>) -> Self {
        let mut timeline = Self::default();
        for m in matches {
            timeline
                .matches
                .entry(m.parsed_date.clone())
                .or_default()
                .entry(m.file_path.clone())
                .or_default()
                .entry(m.sheet_name.clone())
                .or_default()
                .push(m);
        }
        timeline
    }

    /// Dates present, in order
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.matches.keys().map(String::as_str)
    }

    /// Total number of matches
    pub fn len(&self) -> usize {
        self.matches
            .values()
            .flat_map(|files| files.values())
            .flat_map(|sheets| sheets.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
