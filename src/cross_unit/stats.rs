//! Resolver instrumentation.

use std::fmt;

/// Counters describing what a resolution session has done so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Calls to `resolve`.
    pub calls: usize,
    /// Calls answered from the per-symbol memo.
    pub cache_hits: usize,
    /// Index parse attempts (at most one per session).
    pub index_parses: usize,
    /// Symbols absent from the index.
    pub not_in_index: usize,
    /// Calls that ended without a unit to search.
    pub no_unit: usize,
    /// Symbols missing from the unit the index pointed at.
    pub not_found_in_unit: usize,
    /// Calls that produced a merged definition.
    pub successes: usize,
    /// Units loaded successfully.
    pub units_loaded: usize,
    /// Units that failed to load.
    pub load_failures: usize,
    /// Importers created (one per foreign unit merged from).
    pub importers_created: usize,
    /// Merge operations performed.
    pub merges: usize,
}

impl fmt::Display for ResolverStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} calls ({} cached), {} merged, {} not in index, {} without unit, {} not found in unit; \
             {} units loaded, {} failed, {} importers",
            self.calls,
            self.cache_hits,
            self.successes,
            self.not_in_index,
            self.no_unit,
            self.not_found_in_unit,
            self.units_loaded,
            self.load_failures,
            self.importers_created,
        )
    }
}
