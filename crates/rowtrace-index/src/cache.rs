//! Cache lifecycle: lazy first build, full rebuilds, atomic swap.
//!
//! The current snapshot sits behind an `RwLock<Option<Arc<Snapshot>>>`.
//! Readers only hold the read lock long enough to clone the `Arc`; a
//! rebuild runs with no snapshot lock held and takes the write lock only to
//! swap in the finished snapshot. Builds are serialized by a separate mutex.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::debug;

use crate::builder::{CacheBuilder, ExcelOpener, SourceOpener};
use crate::lookup::{EnrichedMatch, LookupEngine};
use crate::settings::Settings;
use crate::snapshot::{BuildReport, Snapshot};
use crate::timeline::Timeline;

/// Owns the current snapshot and exposes lookup and refresh
pub struct CacheManager {
    settings: RwLock<Arc<Settings>>,
    opener: Arc<dyn SourceOpener>,
    current: RwLock<Option<Arc<Snapshot>>>,
    build_lock: Mutex<()>,
    generation: AtomicU64,
}

impl CacheManager {
    /// Manager reading workbooks with calamine
    pub fn new(settings: Settings) -> Self {
        Self::with_opener(settings, Arc::new(ExcelOpener))
    }

    pub fn with_opener(settings: Settings, opener: Arc<dyn SourceOpener>) -> Self {
        Self {
            settings: RwLock::new(Arc::new(settings)),
            opener,
            current: RwLock::new(None),
            build_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Find every record with this key, building the index on first use
    pub fn lookup(&self, key: &str) -> Vec<EnrichedMatch> {
        let snapshot = self.snapshot();
        LookupEngine::lookup(&snapshot, key)
    }

    /// Lookup results grouped by date, file and sheet
    pub fn timeline(&self, key: &str) -> Timeline {
        Timeline::from_matches(self.lookup(key))
    }

    /// Rebuild from the data root and swap the result in
    ///
    /// Lookups keep using the previous snapshot until the swap.
    pub fn refresh(&self) {
        let _guard = self.build_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.rebuild();
    }

    /// Current snapshot, building one if none exists yet
    pub fn snapshot(&self) -> Arc<Snapshot> {
        if let Some(snapshot) = self.current() {
            return snapshot;
        }

        let _guard = self.build_lock.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished the first build while we waited
        if let Some(snapshot) = self.current() {
            return snapshot;
        }
        debug!("index not built yet, building on first use");
        self.rebuild()
    }

    /// Current snapshot without triggering a build
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_built(&self) -> bool {
        self.current().is_some()
    }

    /// Per-file and per-sheet outcomes of the current snapshot's build
    pub fn report(&self) -> BuildReport {
        self.snapshot().report().clone()
    }

    /// Settings used by the next build
    pub fn settings(&self) -> Arc<Settings> {
        Arc::clone(&self.settings.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the settings; takes effect on the next refresh
    pub fn reconfigure(&self, settings: Settings) {
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(settings);
    }

    /// Build and swap; callers must hold `build_lock`
    fn rebuild(&self) -> Arc<Snapshot> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let builder = CacheBuilder::with_opener(self.settings(), Arc::clone(&self.opener));
        let snapshot = Arc::new(builder.build(generation));

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));
        debug!(generation, "snapshot swapped in");
        snapshot
    }
}
