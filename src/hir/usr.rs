//! Stable symbol id generation.
//!
//! The id of a declaration must be the same in every unit that declares it,
//! and the same for a bodiless declaration and its definition. That is the
//! whole contract; how ids are spelled is up to the generator.

use crate::base::SymbolId;

use super::decl::{ContainerKind, DeclGraph, DeclKind, Linkage};
use super::ids::DeclId;

/// Computes the [`SymbolId`] of a declaration.
///
/// Returns `None` when no stable key exists (unnamed or local entities);
/// such declarations are never resolvable across units.
pub trait SymbolIdGenerator {
    fn symbol_id(&self, graph: &DeclGraph, decl: DeclId) -> Option<SymbolId>;
}

impl<F> SymbolIdGenerator for F
where
    F: Fn(&DeclGraph, DeclId) -> Option<SymbolId>,
{
    fn symbol_id(&self, graph: &DeclGraph, decl: DeclId) -> Option<SymbolId> {
        self(graph, decl)
    }
}

/// Default generator producing USR-style ids such as `c:@N@geo@S@Point@F@norm#d#`.
///
/// Namespaces contribute `@N@name`, records `@S@name`, functions
/// `@F@name#signature#` and other declarations `@name`. The body is not part
/// of the id, so declarations and definitions agree.
#[derive(Clone, Copy, Debug, Default)]
pub struct UsrGenerator;

impl UsrGenerator {
    fn push_component(out: &mut String, name: &str, kind: &DeclKind) {
        let tag = match kind {
            DeclKind::Container(ContainerKind::TranslationUnit) => return,
            DeclKind::Container(ContainerKind::Namespace) => "@N@",
            DeclKind::Container(ContainerKind::Record) => "@S@",
            DeclKind::Function { .. } => "@F@",
            DeclKind::Other => "@",
        };
        out.push_str(tag);
        out.push_str(name);
        if let DeclKind::Function { signature, .. } = kind {
            out.push('#');
            out.push_str(signature);
            out.push('#');
        }
    }
}

impl SymbolIdGenerator for UsrGenerator {
    fn symbol_id(&self, graph: &DeclGraph, decl: DeclId) -> Option<SymbolId> {
        let target = graph.get(decl)?;
        if target.name.is_empty() || target.linkage == Linkage::None {
            return None;
        }

        let mut chain: Vec<DeclId> = graph.ancestors(decl).collect();
        chain.reverse();

        let mut usr = String::from("c:");
        for id in chain {
            let ancestor = &graph[id];
            Self::push_component(&mut usr, &ancestor.name, &ancestor.kind);
        }
        Self::push_component(&mut usr, &target.name, &target.kind);
        Some(SymbolId::from(usr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usr_for_nested_function() {
        let mut graph = DeclGraph::new();
        let ns = graph.add_namespace(graph.root(), "geo");
        let rec = graph.add_record(ns, "Point");
        let f = graph.add_function(rec, "norm", "d", None, Linkage::External);

        let id = UsrGenerator.symbol_id(&graph, f).unwrap();
        assert_eq!(id.as_str(), "c:@N@geo@S@Point@F@norm#d#");
    }

    #[test]
    fn test_usr_ignores_body() {
        let mut graph = DeclGraph::new();
        let decl = graph.add_function(graph.root(), "f", "I", None, Linkage::External);
        let def = graph.add_function(graph.root(), "f", "I", Some("{ return 0; }"), Linkage::External);

        assert_eq!(
            UsrGenerator.symbol_id(&graph, decl),
            UsrGenerator.symbol_id(&graph, def)
        );
        assert_eq!(UsrGenerator.symbol_id(&graph, decl).unwrap().as_str(), "c:@F@f#I#");
    }

    #[test]
    fn test_usr_for_variable_in_record() {
        let mut graph = DeclGraph::new();
        let rec = graph.add_record(graph.root(), "Config");
        let var = graph.add_other(rec, "instance", Linkage::External);

        assert_eq!(UsrGenerator.symbol_id(&graph, var).unwrap().as_str(), "c:@S@Config@instance");
    }

    #[test]
    fn test_no_usr_for_unnamed_or_local() {
        let mut graph = DeclGraph::new();
        let anon = graph.add_function(graph.root(), "", "", None, Linkage::External);
        let local = graph.add_other(graph.root(), "tmp", Linkage::None);

        assert!(UsrGenerator.symbol_id(&graph, anon).is_none());
        assert!(UsrGenerator.symbol_id(&graph, local).is_none());
    }

    #[test]
    fn test_closure_generator() {
        let mut graph = DeclGraph::new();
        let f = graph.add_function(graph.root(), "f", "", None, Linkage::External);
        let by_name = |g: &DeclGraph, d: DeclId| Some(SymbolId::from(format!("sym_{}", g[d].name)));

        assert_eq!(by_name.symbol_id(&graph, f).unwrap().as_str(), "sym_f");
    }
}
