//! Property-based tests for the index file format.
//!
//! Generated entries are rendered with `index_bytes` and parsed back; every
//! id must map to its path joined onto the base directory.
#![cfg(feature = "proptest")]

use std::collections::BTreeMap;
use std::path::Path;

use proptest::prelude::*;

use ctu::project::{index_bytes, merge_definition_records, Index, IndexEntry};

// ============================================================================
// PROPTEST STRATEGIES
// ============================================================================

/// Symbol ids never contain spaces.
fn arb_symbol_id() -> impl Strategy<Value = String> {
    "c:(@N@[a-z]{1,6}){0,2}@F@[a-z_][a-z0-9_]{0,10}#[A-Za-z]{0,4}#"
}

/// Relative paths, which may contain spaces after the first character.
fn arb_unit_path() -> impl Strategy<Value = String> {
    "[a-z]{1,6}(/[a-z ]{1,6}){0,2}\\.ast"
}

fn arb_entries() -> impl Strategy<Value = BTreeMap<String, String>> {
    proptest::collection::btree_map(arb_symbol_id(), arb_unit_path(), 0..20)
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_index_roundtrip(entries in arb_entries()) {
        let base = Path::new("/project/ctu");
        let rendered: Vec<IndexEntry> = entries
            .iter()
            .map(|(id, path)| IndexEntry::new(id.as_str(), path.as_str()))
            .collect();

        let index = Index::parse_bytes(&index_bytes(&rendered), base).unwrap();

        prop_assert_eq!(index.len(), entries.len());
        for (id, path) in &entries {
            let expected = base.join(path);
            prop_assert_eq!(index.get(id), Some(expected.as_path()));
        }
    }

    #[test]
    fn prop_merge_keeps_first_record(
        entries in arb_entries(),
        shadow in arb_unit_path(),
    ) {
        let mut records = String::new();
        for (id, path) in &entries {
            records.push_str(&format!("!{id} {path}\n"));
        }
        for id in entries.keys() {
            records.push_str(&format!("{id} {shadow}\n"));
        }

        let merged = merge_definition_records(&records).unwrap();

        prop_assert_eq!(merged.len(), entries.len());
        for (entry, (id, path)) in merged.iter().zip(&entries) {
            prop_assert_eq!(entry.id.as_str(), id.as_str());
            prop_assert_eq!(entry.path.as_path(), Path::new(path));
        }
    }
}
