//! The resolver facade.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::base::{SymbolId, UnitId};
use crate::hir::{
    find_definition, DeclGraph, DeclId, ImporterRegistry, MergeImporter, StructuralImporter,
    SymbolIdGenerator, UsrGenerator,
};
use crate::project::{Index, UnitCache, UnitLoader};

use super::config::CrossUnitConfig;
use super::diagnostics::{Diagnostic, DiagnosticCollector};
use super::stats::ResolverStats;

/// The index of a session: parsed at most once, whatever the outcome.
#[derive(Debug)]
enum IndexState {
    NotLoaded,
    Loaded { path: PathBuf, index: Index },
    Unavailable { path: PathBuf },
}

impl IndexState {
    fn path(&self) -> Option<&Path> {
        match self {
            IndexState::NotLoaded => None,
            IndexState::Loaded { path, .. } | IndexState::Unavailable { path } => Some(path),
        }
    }
}

/// Memoized outcome of resolving one symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Resolution {
    Absent,
    Merged { unit: UnitId, decl: DeclId },
}

enum IndexLookup {
    Unavailable,
    NotIndexed,
    Unit(PathBuf),
}

/// Resolves bodiless declarations against definitions in other units.
///
/// One context serves one analysis of one destination unit: every merged
/// definition lands in the [`DeclGraph`] passed to [`resolve`](Self::resolve),
/// which must therefore be the same graph on every call. All caches live in
/// the context and go away with it; nothing is shared between contexts.
///
/// ```
/// use std::path::Path;
/// use ctu::cross_unit::CrossUnitContext;
/// use ctu::hir::{DeclGraph, Linkage};
/// use ctu::project::LoadError;
///
/// let loader = |path: &Path| -> Result<DeclGraph, LoadError> {
///     Err(LoadError::Malformed { path: path.to_path_buf(), message: "unused".into() })
/// };
/// let mut ctu = CrossUnitContext::new(loader);
/// let mut tu = DeclGraph::new();
/// let f = tu.add_function(tu.root(), "f", "I", None, Linkage::External);
///
/// // No index in this directory: nothing to merge, one diagnostic.
/// assert_eq!(ctu.resolve(&mut tu, f, Path::new("/nonexistent"), "index.txt"), None);
/// assert_eq!(ctu.diagnostics().len(), 1);
/// ```
pub struct CrossUnitContext<L, G = UsrGenerator, I = StructuralImporter> {
    config: CrossUnitConfig,
    generator: G,
    /// Symbol → outcome, including known absences
    symbols: FxHashMap<SymbolId, Resolution>,
    /// Path → loaded unit (or failure)
    units: UnitCache<L>,
    index: IndexState,
    /// Foreign unit → importer
    importers: ImporterRegistry<I>,
    diagnostics: DiagnosticCollector,
    stats: ResolverStats,
}

impl<L: UnitLoader> CrossUnitContext<L> {
    /// Create a context using USR-style symbol ids and structural merging.
    pub fn new(loader: L) -> Self {
        Self::with_generator(loader, UsrGenerator)
    }
}

impl<L, G, I> CrossUnitContext<L, G, I>
where
    L: UnitLoader,
    G: SymbolIdGenerator,
    I: MergeImporter + Default,
{
    pub fn with_generator(loader: L, generator: G) -> Self {
        Self {
            config: CrossUnitConfig::default(),
            generator,
            symbols: FxHashMap::default(),
            units: UnitCache::new(loader),
            index: IndexState::NotLoaded,
            importers: ImporterRegistry::new(),
            diagnostics: DiagnosticCollector::new(),
            stats: ResolverStats::default(),
        }
    }

    pub fn with_config(mut self, config: CrossUnitConfig) -> Self {
        self.config = config;
        self
    }

    /// Find the definition of `decl` in another unit and merge it into `dest`.
    ///
    /// `decl` must not have a body in `dest`. The index file `index_name` in
    /// `index_dir` is read on the first call of the session; unit paths in it
    /// are relative to `index_dir`.
    ///
    /// Returns the merged, locally owned definition, or `None` when no
    /// definition is available for any reason. `decl` itself is left
    /// untouched. Failures worth reporting end up in
    /// [`diagnostics`](Self::diagnostics).
    pub fn resolve(
        &mut self,
        dest: &mut DeclGraph,
        decl: DeclId,
        index_dir: &Path,
        index_name: &str,
    ) -> Option<DeclId> {
        debug_assert!(
            !dest.has_body(decl),
            "{decl:?} already has a definition in the current unit"
        );
        if dest.has_body(decl) {
            return Some(decl);
        }
        self.stats.calls += 1;

        let target = self.generator.symbol_id(dest, decl).filter(|id| !id.is_empty())?;

        let resolution = match self.symbols.get(&target) {
            Some(&cached) => {
                self.stats.cache_hits += 1;
                trace!(symbol = %target, ?cached, "symbol memo hit");
                cached
            }
            None => {
                let resolution = self.resolve_uncached(dest, &target, index_dir, index_name);
                self.symbols.insert(target, resolution);
                resolution
            }
        };

        match resolution {
            Resolution::Merged { decl, .. } => Some(decl),
            Resolution::Absent => None,
        }
    }

    fn resolve_uncached(
        &mut self,
        dest: &mut DeclGraph,
        target: &SymbolId,
        index_dir: &Path,
        index_name: &str,
    ) -> Resolution {
        let path = match self.lookup(target, index_dir, index_name) {
            IndexLookup::Unit(path) => path,
            IndexLookup::NotIndexed => {
                trace!(symbol = %target, "not in the index");
                self.stats.not_in_index += 1;
                return Resolution::Absent;
            }
            IndexLookup::Unavailable => {
                self.stats.no_unit += 1;
                return Resolution::Absent;
            }
        };

        let Some(unit_id) = self.load_unit(&path) else {
            self.stats.no_unit += 1;
            return Resolution::Absent;
        };
        let Some(unit) = self.units.get(unit_id) else {
            self.stats.no_unit += 1;
            return Resolution::Absent;
        };

        let Some(found) = find_definition(unit.graph(), unit.root(), target, &self.generator) else {
            debug!(
                symbol = %target,
                path = %unit.path().display(),
                "definition not found in the unit named by the index"
            );
            self.stats.not_found_in_unit += 1;
            return Resolution::Absent;
        };

        let local = self
            .importers
            .get_or_create(unit_id)
            .import(unit.graph(), dest, found);
        self.stats.merges += 1;
        debug_assert!(dest.has_body(local), "merged definition has no body");

        debug!(symbol = %target, unit = %unit_id, ?local, "merged cross-unit definition");
        self.stats.successes += 1;
        Resolution::Merged {
            unit: unit_id,
            decl: local,
        }
    }

    fn lookup(&mut self, target: &SymbolId, index_dir: &Path, index_name: &str) -> IndexLookup {
        match self.ensure_index(index_dir, index_name) {
            None => IndexLookup::Unavailable,
            Some(index) => match index.get(target.as_str()) {
                Some(path) => IndexLookup::Unit(path.to_path_buf()),
                None => IndexLookup::NotIndexed,
            },
        }
    }

    fn ensure_index(&mut self, index_dir: &Path, index_name: &str) -> Option<&Index> {
        let requested = index_dir.join(index_name);
        match self.index.path() {
            None => {
                self.stats.index_parses += 1;
                self.index = match self.config.index_parser().parse(&requested, index_dir) {
                    Ok(index) => {
                        debug!(path = %requested.display(), entries = index.len(), "loaded cross-unit index");
                        IndexState::Loaded {
                            path: requested,
                            index,
                        }
                    }
                    Err(err) => {
                        warn!(path = %requested.display(), error = %err, "cross-unit index unavailable");
                        self.diagnostics.index_error(&requested, &err);
                        IndexState::Unavailable { path: requested }
                    }
                };
            }
            Some(current) if current != requested => {
                debug!(
                    current = %current.display(),
                    requested = %requested.display(),
                    "index already bound for this session"
                );
            }
            Some(_) => {}
        }

        match &self.index {
            IndexState::Loaded { index, .. } => Some(index),
            _ => None,
        }
    }

    fn load_unit(&mut self, path: &Path) -> Option<UnitId> {
        let unit = self.units.load(path);
        for err in self.units.take_failures() {
            if self.config.report_load_failures {
                self.diagnostics.unit_load_failure(&err);
            }
        }
        unit
    }
}

impl<L, G, I> CrossUnitContext<L, G, I> {
    pub fn config(&self) -> &CrossUnitConfig {
        &self.config
    }

    /// The session index, once it has been parsed successfully.
    pub fn index(&self) -> Option<&Index> {
        match &self.index {
            IndexState::Loaded { index, .. } => Some(index),
            _ => None,
        }
    }

    pub fn units(&self) -> &UnitCache<L> {
        &self.units
    }

    pub fn importers(&self) -> &ImporterRegistry<I> {
        &self.importers
    }

    /// The merged definition for `symbol`, if an earlier call produced one.
    pub fn resolved(&self, symbol: &str) -> Option<DeclId> {
        match self.symbols.get(symbol) {
            Some(Resolution::Merged { decl, .. }) => Some(*decl),
            _ => None,
        }
    }

    /// The foreign unit a merged definition for `symbol` came from.
    pub fn source_unit(&self, symbol: &str) -> Option<UnitId> {
        match self.symbols.get(symbol) {
            Some(Resolution::Merged { unit, .. }) => Some(*unit),
            _ => None,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.diagnostics()
    }

    /// Drain the diagnostics reported so far.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            units_loaded: self.units.len(),
            load_failures: self.units.failure_count(),
            importers_created: self.importers.len(),
            ..self.stats
        }
    }
}
