//! # syster-ctu
//!
//! Cross-unit definition resolution: given a declaration without a body in
//! the unit under analysis, find the unit that defines it, load that unit,
//! locate the definition and merge it into the current unit.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! cross_unit → Resolver facade (CrossUnitContext), config, diagnostics, stats
//!   ↓
//! project    → Index files, unit loading and caching
//!   ↓
//! hir        → Declaration graph, symbol ids, lookup, merge
//!   ↓
//! base       → Primitives (UnitId, SymbolId)
//! ```

/// Foundation types: UnitId, SymbolId
pub mod base;

/// Declaration graph and the operations on it
pub mod hir;

/// Index files and unit snapshots
pub mod project;

/// The resolver facade
pub mod cross_unit;

pub use base::{SymbolId, UnitId};
pub use cross_unit::{CrossUnitConfig, CrossUnitContext, ResolverStats};
pub use hir::{DeclGraph, DeclId};
pub use project::{Index, IndexEntry, IndexError, LoadError, UnitLoader};
