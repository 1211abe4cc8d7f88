//! Session configuration.

use crate::project::IndexParser;

/// Settings of a [`CrossUnitContext`](super::CrossUnitContext).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossUnitConfig {
    /// Canonicalize unit paths read from the index (see [`IndexParser`]).
    pub canonicalize_paths: bool,
    /// Record a diagnostic for every unit that fails to load.
    pub report_load_failures: bool,
}

impl Default for CrossUnitConfig {
    fn default() -> Self {
        Self {
            canonicalize_paths: false,
            report_load_failures: true,
        }
    }
}

impl CrossUnitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canonical_paths(mut self, enabled: bool) -> Self {
        self.canonicalize_paths = enabled;
        self
    }

    pub fn with_load_failure_reports(mut self, enabled: bool) -> Self {
        self.report_load_failures = enabled;
        self
    }

    pub(crate) fn index_parser(&self) -> IndexParser {
        IndexParser::new().with_canonical_paths(self.canonicalize_paths)
    }
}
