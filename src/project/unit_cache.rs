//! Load-once cache of foreign units, keyed by path.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::base::UnitId;
use crate::hir::{DeclGraph, DeclId};

use super::unit_loader::{LoadError, UnitLoader};

/// A foreign unit that has been loaded from disk.
#[derive(Debug)]
pub struct LoadedUnit {
    id: UnitId,
    path: PathBuf,
    graph: DeclGraph,
}

impl LoadedUnit {
    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn graph(&self) -> &DeclGraph {
        &self.graph
    }

    pub fn root(&self) -> DeclId {
        self.graph.root()
    }
}

/// Loads each unit at most once and owns every unit it loaded.
///
/// Failures are cached as well: a path that failed to load is never handed
/// to the loader again. The key is the path exactly as given, so callers
/// must spell a path the same way every time.
#[derive(Debug)]
pub struct UnitCache<L> {
    loader: L,
    /// UnitId → unit; ids are indices into this vector
    units: Vec<LoadedUnit>,
    /// Path → load outcome
    by_path: FxHashMap<PathBuf, Option<UnitId>>,
    /// Failures not yet collected by the owner
    pending_failures: Vec<LoadError>,
    failed: usize,
}

impl<L: UnitLoader> UnitCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            units: Vec::new(),
            by_path: FxHashMap::default(),
            pending_failures: Vec::new(),
            failed: 0,
        }
    }

    /// Load the unit at `path`, or return the outcome of an earlier attempt.
    pub fn load(&mut self, path: &Path) -> Option<UnitId> {
        if let Some(&cached) = self.by_path.get(path) {
            trace!(path = %path.display(), ?cached, "unit cache hit");
            return cached;
        }

        let outcome = match self.loader.load(path) {
            Ok(graph) => {
                let id = UnitId::new(self.units.len() as u32);
                debug!(path = %path.display(), unit = %id, decls = graph.len(), "loaded unit");
                self.units.push(LoadedUnit {
                    id,
                    path: path.to_path_buf(),
                    graph,
                });
                Some(id)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to load unit");
                self.failed += 1;
                self.pending_failures.push(err);
                None
            }
        };
        self.by_path.insert(path.to_path_buf(), outcome);
        outcome
    }
}

impl<L> UnitCache<L> {
    pub fn get(&self, id: UnitId) -> Option<&LoadedUnit> {
        self.units.get(id.index() as usize)
    }

    /// Whether `path` has been attempted, and with what outcome.
    pub fn cached(&self, path: &Path) -> Option<Option<UnitId>> {
        self.by_path.get(path).copied()
    }

    /// Failures recorded since the last call.
    pub fn take_failures(&mut self) -> Vec<LoadError> {
        std::mem::take(&mut self.pending_failures)
    }

    /// Number of units loaded successfully.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Number of paths that failed to load.
    pub fn failure_count(&self) -> usize {
        self.failed
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}
