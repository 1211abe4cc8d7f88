//! Everything that touches persisted data: index files and unit snapshots.

mod index;
mod index_builder;
mod unit_cache;
mod unit_loader;

pub use index::{index_bytes, index_string, parse_index, Index, IndexEntry, IndexError, IndexParser};
pub use index_builder::{collect_definitions, collect_from_units, merge_definition_records};
pub use unit_cache::{LoadedUnit, UnitCache};
pub use unit_loader::{LoadError, UnitLoader};

#[cfg(feature = "interchange")]
pub use unit_loader::{save_snapshot, SnapshotLoader};
