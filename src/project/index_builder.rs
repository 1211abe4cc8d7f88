//! Producer side of the index: collecting definitions from units.
//!
//! The analysis itself only reads indexes; these helpers build them. Writing
//! the result into a file shared by several processes (and the locking that
//! requires) is left to the calling tool.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::base::SymbolId;
use crate::hir::{DeclGraph, DeclId, SymbolIdGenerator};

use super::index::{IndexEntry, IndexError};
use super::unit_loader::UnitLoader;

/// Marks a definition located in the primary file of the scanned unit.
const PRIMARY_FILE_MARKER: char = '!';

/// One index entry per externally visible definition in `graph`.
pub fn collect_definitions<G>(graph: &DeclGraph, unit_path: &Path, generator: &G) -> Vec<IndexEntry>
where
    G: SymbolIdGenerator + ?Sized,
{
    let mut entries = Vec::new();
    collect_in_scope(graph, graph.root(), unit_path, generator, &mut entries);
    entries
}

fn collect_in_scope<G>(
    graph: &DeclGraph,
    scope: DeclId,
    unit_path: &Path,
    generator: &G,
    out: &mut Vec<IndexEntry>,
) where
    G: SymbolIdGenerator + ?Sized,
{
    for &child in graph.children(scope) {
        let decl = &graph[child];
        if decl.is_definition() && decl.is_externally_visible() {
            if let Some(id) = generator.symbol_id(graph, child).filter(|id| !id.is_empty()) {
                out.push(IndexEntry::new(id, unit_path));
            }
        }
        collect_in_scope(graph, child, unit_path, generator, out);
    }
}

/// Load every unit in `paths` in parallel and collect their definitions.
///
/// Units that fail to load are skipped. Entries keep the order of `paths`.
pub fn collect_from_units<L, G>(loader: &L, paths: &[PathBuf], generator: &G) -> Vec<IndexEntry>
where
    L: UnitLoader + Sync,
    G: SymbolIdGenerator + Sync,
{
    let per_unit: Vec<Vec<IndexEntry>> = paths
        .par_iter()
        .map(|path| match loader.load(path) {
            Ok(graph) => collect_definitions(&graph, path, generator),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unit");
                Vec::new()
            }
        })
        .collect();
    per_unit.into_iter().flatten().collect()
}

/// Combine raw producer records into index entries.
///
/// Each line is `[!]<symbol-id> <path>`; the `!` marker is dropped. When an
/// id is defined by several units the first record wins. Paths are taken
/// verbatim.
pub fn merge_definition_records(text: &str) -> Result<Vec<IndexEntry>, IndexError> {
    let mut seen: FxHashSet<SymbolId> = FxHashSet::default();
    let mut entries = Vec::new();

    for (line_no, line) in text.lines().enumerate().map(|(i, l)| (i + 1, l)) {
        if line.is_empty() {
            continue;
        }
        let Some((id, path)) = line.split_once(' ') else {
            return Err(IndexError::InvalidIndexFormat { line: line_no });
        };
        let id = id.strip_prefix(PRIMARY_FILE_MARKER).unwrap_or(id);
        if id.is_empty() {
            return Err(IndexError::InvalidIndexFormat { line: line_no });
        }
        let id = SymbolId::new(id);
        if seen.contains(&id) {
            debug!(symbol = %id, path, "dropping duplicate definition record");
            continue;
        }
        seen.insert(id.clone());
        entries.push(IndexEntry::new(id, path));
    }

    Ok(entries)
}
