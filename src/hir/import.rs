//! Structural merge of foreign declarations into the destination graph.
//!
//! An importer copies declaration subtrees out of one foreign unit and
//! remembers every node it has produced. Asking it again for a node it has
//! already copied returns the earlier copy, so repeated imports from the
//! same foreign unit share their common ancestors.
//!
//! That memo is only consistent if there is exactly one importer per foreign
//! unit, which is what [`ImporterRegistry`] guarantees.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::base::UnitId;

use super::decl::DeclGraph;
use super::ids::DeclId;

/// A stateful merge engine bound to one foreign unit.
///
/// Implementations must be idempotent per node: importing a foreign node
/// twice yields the same local node.
pub trait MergeImporter {
    /// Copy `decl` from `from` into `to` and return the local copy.
    fn import(&mut self, from: &DeclGraph, to: &mut DeclGraph, decl: DeclId) -> DeclId;
}

/// Default importer: plain structural copy with a foreign → local memo.
///
/// The foreign root maps onto the destination root. Ancestors of an
/// imported node are copied on their own (without their other children);
/// the imported node itself is copied together with its whole subtree.
#[derive(Debug, Default)]
pub struct StructuralImporter {
    /// Foreign DeclId → local DeclId
    imported: FxHashMap<DeclId, DeclId>,
    /// Foreign nodes whose whole subtree has been copied
    complete: FxHashSet<DeclId>,
}

impl StructuralImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local copy of a foreign node, if it has been imported already.
    pub fn imported(&self, foreign: DeclId) -> Option<DeclId> {
        self.imported.get(&foreign).copied()
    }

    /// Number of foreign nodes copied so far.
    pub fn len(&self) -> usize {
        self.imported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imported.is_empty()
    }

    /// Copy a single node (and whatever ancestors are missing) without its children.
    fn import_shallow(&mut self, from: &DeclGraph, to: &mut DeclGraph, decl: DeclId) -> DeclId {
        if let Some(&local) = self.imported.get(&decl) {
            return local;
        }
        if decl == from.root() {
            let root = to.root();
            self.imported.insert(decl, root);
            return root;
        }
        let local_parent = match from.parent(decl) {
            Some(parent) => self.import_shallow(from, to, parent),
            None => to.root(),
        };
        let local = to.add(local_parent, from[decl].detached());
        self.imported.insert(decl, local);
        local
    }

    /// Copy a node and every descendant not copied yet.
    fn import_subtree(&mut self, from: &DeclGraph, to: &mut DeclGraph, decl: DeclId) -> DeclId {
        let local = self.import_shallow(from, to, decl);
        if self.complete.insert(decl) {
            for &child in from.children(decl) {
                self.import_subtree(from, to, child);
            }
        }
        local
    }
}

impl MergeImporter for StructuralImporter {
    fn import(&mut self, from: &DeclGraph, to: &mut DeclGraph, decl: DeclId) -> DeclId {
        self.import_subtree(from, to, decl)
    }
}

// ============================================================================
// IMPORTER REGISTRY
// ============================================================================

/// Owns exactly one importer per foreign unit.
///
/// Importers are created lazily on first use and live as long as the
/// registry. All of them merge into the single destination graph of the
/// session that owns the registry.
#[derive(Debug)]
pub struct ImporterRegistry<I = StructuralImporter> {
    importers: FxHashMap<UnitId, I>,
}

impl<I> Default for ImporterRegistry<I> {
    fn default() -> Self {
        Self {
            importers: FxHashMap::default(),
        }
    }
}

impl<I: MergeImporter + Default> ImporterRegistry<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The importer for `unit`, created on first request.
    pub fn get_or_create(&mut self, unit: UnitId) -> &mut I {
        self.importers.entry(unit).or_insert_with(|| {
            debug!(%unit, "creating importer");
            I::default()
        })
    }
}

impl<I> ImporterRegistry<I> {
    pub fn get(&self, unit: UnitId) -> Option<&I> {
        self.importers.get(&unit)
    }

    /// Number of importers created so far.
    pub fn len(&self) -> usize {
        self.importers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.importers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::Linkage;

    fn foreign_unit() -> (DeclGraph, DeclId, DeclId, DeclId) {
        let mut graph = DeclGraph::new();
        let ns = graph.add_namespace(graph.root(), "lib");
        let f = graph.add_function(ns, "f", "", Some("{ return 1; }"), Linkage::External);
        let g = graph.add_function(ns, "g", "", Some("{ return 2; }"), Linkage::External);
        (graph, ns, f, g)
    }

    #[test]
    fn test_import_copies_ancestors_and_body() {
        let (from, _, f, _) = foreign_unit();
        let mut to = DeclGraph::new();
        let mut importer = StructuralImporter::new();

        let local = importer.import(&from, &mut to, f);

        assert!(to.has_body(local));
        assert_eq!(to.qualified_name(local), "lib::f");
        // root + lib + f; g is not pulled in
        assert_eq!(to.len(), 3);
    }

    #[test]
    fn test_import_is_idempotent() {
        let (from, _, f, _) = foreign_unit();
        let mut to = DeclGraph::new();
        let mut importer = StructuralImporter::new();

        let first = importer.import(&from, &mut to, f);
        let second = importer.import(&from, &mut to, f);

        assert_eq!(first, second);
        assert_eq!(to.len(), 3);
    }

    #[test]
    fn test_shared_ancestor_reused() {
        let (from, _, f, g) = foreign_unit();
        let mut to = DeclGraph::new();
        let mut importer = StructuralImporter::new();

        let lf = importer.import(&from, &mut to, f);
        let lg = importer.import(&from, &mut to, g);

        assert_eq!(to.parent(lf), to.parent(lg));
        assert_eq!(to.children(to.root()).len(), 1);
    }

    #[test]
    fn test_separate_importers_duplicate_ancestors() {
        let (from, _, f, g) = foreign_unit();
        let mut to = DeclGraph::new();

        let lf = StructuralImporter::new().import(&from, &mut to, f);
        let lg = StructuralImporter::new().import(&from, &mut to, g);

        assert_ne!(to.parent(lf), to.parent(lg));
    }

    #[test]
    fn test_full_import_after_shallow_ancestor() {
        let (from, ns, f, g) = foreign_unit();
        let mut to = DeclGraph::new();
        let mut importer = StructuralImporter::new();

        let lf = importer.import(&from, &mut to, f);
        let lns = importer.import(&from, &mut to, ns);

        assert_eq!(to.parent(lf), Some(lns));
        assert_eq!(to.children(lns).len(), 2);
        assert!(importer.imported(g).is_some());
    }

    #[test]
    fn test_registry_one_importer_per_unit() {
        let mut registry: ImporterRegistry = ImporterRegistry::new();

        registry.get_or_create(UnitId::new(0));
        registry.get_or_create(UnitId::new(1));
        registry.get_or_create(UnitId::new(0));

        assert_eq!(registry.len(), 2);
        assert!(registry.get(UnitId::new(1)).is_some());
        assert!(registry.get(UnitId::new(2)).is_none());
    }

    #[test]
    fn test_registry_keeps_importer_state() {
        let (from, _, f, _) = foreign_unit();
        let mut to = DeclGraph::new();
        let mut registry: ImporterRegistry = ImporterRegistry::new();
        let unit = UnitId::new(3);

        let first = registry.get_or_create(unit).import(&from, &mut to, f);
        let second = registry.get_or_create(unit).import(&from, &mut to, f);

        assert_eq!(first, second);
        assert_eq!(registry.get(unit).map(StructuralImporter::len), Some(3));
    }
}
