//! Process-wide memo of built forests, keyed by structure file path.
//!
//! A path is built at most once per cache and never refreshed. Each path has
//! its own slot lock, so concurrent first requests for the same path build
//! once and the others wait for that result; different paths build in
//! parallel. A failed build leaves the slot empty for the next caller.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::error::Error;
use crate::parser::{load_forest, Forest};

/// Source of built forests.
#[cfg_attr(test, mockall::automock)]
pub trait StructureLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Forest, Error>;
}

/// Reads and builds structure files from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

impl StructureLoader for FsLoader {
    fn load(&self, path: &Path) -> Result<Forest, Error> {
        load_forest(path)
    }
}

type Slot = Arc<Mutex<Option<Arc<Forest>>>>;

pub struct StructureCache<L = FsLoader> {
    loader: L,
    slots: Mutex<HashMap<PathBuf, Slot>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StructureCache<FsLoader> {
    /// The cache shared by every request in this process.
    pub fn global() -> &'static StructureCache<FsLoader> {
        static GLOBAL: OnceLock<StructureCache<FsLoader>> = OnceLock::new();
        GLOBAL.get_or_init(|| StructureCache::new(FsLoader))
    }
}

impl<L: StructureLoader> StructureCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Return the forest for `path`, building it on first request.
    pub fn get_or_build(&self, path: &Path) -> Result<Arc<Forest>, Error> {
        let slot = {
            let mut slots = lock(&self.slots);
            Arc::clone(slots.entry(path.to_path_buf()).or_default())
        };

        let mut entry = lock(&slot);
        if let Some(forest) = entry.as_ref() {
            tracing::trace!(path = %path.display(), "structure cache hit");
            return Ok(Arc::clone(forest));
        }

        tracing::info!(path = %path.display(), "loading structure file");
        let forest = Arc::new(self.loader.load(path)?);
        *entry = Some(Arc::clone(&forest));
        Ok(forest)
    }

    pub fn is_cached(&self, path: &Path) -> bool {
        let Some(slot) = lock(&self.slots).get(path).cloned() else {
            return false;
        };
        let cached = lock(&slot).is_some();
        cached
    }
}
