//! Foundation types for cross-unit resolution.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`UnitId`] - Identity of a loaded foreign unit
//! - [`SymbolId`] - Stable, cross-unit symbol keys
//!
//! This module has NO dependencies on other modules of the crate.

mod symbol_id;
mod unit_id;

pub use symbol_id::SymbolId;
pub use unit_id::UnitId;
