//! Cross-unit definition resolution.
//!
//! [`CrossUnitContext`] ties the pieces together: it parses the index once
//! per session, loads each foreign unit at most once, searches it for the
//! requested definition and merges that definition into the destination
//! graph through the one importer it keeps per foreign unit.

mod config;
mod context;
mod diagnostics;
mod stats;

pub use config::CrossUnitConfig;
pub use context::CrossUnitContext;
pub use diagnostics::{codes, Diagnostic, DiagnosticCollector, Severity};
pub use stats::ResolverStats;
