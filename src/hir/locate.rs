//! Definition lookup inside a loaded unit.

use crate::base::SymbolId;

use super::decl::DeclGraph;
use super::ids::DeclId;
use super::usr::SymbolIdGenerator;

/// Find the externally visible definition with id `target` below `scope`.
///
/// Walks the scope tree depth-first in declaration order: each declaration
/// is checked before its own nested declarations, and those before the next
/// sibling. Only definitions with external linkage are compared; an index
/// never records anything else. `scope` itself is not a candidate.
///
/// `None` is a normal outcome: the index may claim a unit that, after
/// preprocessing or instantiation differences, does not hold the symbol.
pub fn find_definition<G>(
    graph: &DeclGraph,
    scope: DeclId,
    target: &SymbolId,
    generator: &G,
) -> Option<DeclId>
where
    G: SymbolIdGenerator + ?Sized,
{
    for &child in graph.children(scope) {
        let decl = &graph[child];
        if decl.is_definition()
            && decl.is_externally_visible()
            && generator.symbol_id(graph, child).as_ref() == Some(target)
        {
            return Some(child);
        }
        if let Some(found) = find_definition(graph, child, target, generator) {
            return Some(found);
        }
    }
    None
}
