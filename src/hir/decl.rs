//! Declaration graph: the symbol graph of one unit.
//!
//! Every unit (the one being analyzed as well as each foreign unit loaded
//! from a snapshot) owns a [`DeclGraph`]. Declarations live in a flat arena
//! and point at each other through [`DeclId`]s, so a foreign graph can be
//! walked while the destination graph is being mutated.
//!
//! Node kinds form a closed set: containers (translation unit, namespaces,
//! records), functions (which are definitions when they carry a body) and
//! everything else. All kinds expose their nested declarations through the
//! same [`DeclGraph::children`] accessor.

use smol_str::SmolStr;

use super::ids::DeclId;

// ============================================================================
// DECLARATION KINDS
// ============================================================================

/// Kinds of declarations whose main purpose is to hold other declarations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerKind {
    TranslationUnit,
    Namespace,
    Record,
}

/// The body of a function definition.
///
/// Opaque to this crate: it is carried along by merges and its presence is
/// what makes a function declaration a definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    pub text: SmolStr,
}

impl Body {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            text: SmolStr::new(text),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclKind {
    Container(ContainerKind),
    Function {
        /// Encoded parameter types, part of the stable symbol id.
        signature: SmolStr,
        body: Option<Body>,
    },
    /// Variables, typedefs, enumerators and anything else that can never be
    /// the target of a cross-unit resolution.
    Other,
}

impl DeclKind {
    pub fn is_container(&self) -> bool {
        matches!(self, DeclKind::Container(_))
    }

    pub fn body(&self) -> Option<&Body> {
        match self {
            DeclKind::Function { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

/// Linkage of a declaration, as seen by other units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub enum Linkage {
    /// Visible from other units; the only linkage an index ever records.
    #[default]
    External,
    /// Visible only inside its own unit (`static` functions, anonymous namespaces).
    Internal,
    /// Local entities (block-scope declarations, parameters).
    None,
}

// ============================================================================
// DECLARATION
// ============================================================================

/// A single node of the declaration graph.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Decl {
    pub name: SmolStr,
    pub kind: DeclKind,
    pub linkage: Linkage,
    parent: Option<DeclId>,
    children: Vec<DeclId>,
}

impl Decl {
    /// Create a detached declaration (no parent, no children yet).
    pub fn new(name: impl AsRef<str>, kind: DeclKind, linkage: Linkage) -> Self {
        Self {
            name: SmolStr::new(name),
            kind,
            linkage,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<DeclId> {
        self.parent
    }

    pub fn children(&self) -> &[DeclId] {
        &self.children
    }

    /// A definition is a declaration that carries a body.
    pub fn is_definition(&self) -> bool {
        self.kind.body().is_some()
    }

    /// Whether other units can refer to this declaration.
    pub fn is_externally_visible(&self) -> bool {
        self.linkage == Linkage::External
    }

    /// Same name, kind and linkage, without any graph links.
    pub(crate) fn detached(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind.clone(),
            linkage: self.linkage,
            parent: None,
            children: Vec::new(),
        }
    }
}

// ============================================================================
// DECLARATION GRAPH
// ============================================================================

/// The declaration graph of one unit.
///
/// Node [`DeclId::ROOT`] is always the translation unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclGraph {
    decls: Vec<Decl>,
}

impl Default for DeclGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclGraph {
    /// Create a graph holding only the translation unit root.
    pub fn new() -> Self {
        Self {
            decls: vec![Decl::new(
                "",
                DeclKind::Container(ContainerKind::TranslationUnit),
                Linkage::External,
            )],
        }
    }

    pub fn root(&self) -> DeclId {
        DeclId::ROOT
    }

    pub fn get(&self, id: DeclId) -> Option<&Decl> {
        self.decls.get(id.0 as usize)
    }

    /// Append `decl` as the last child of `parent`.
    ///
    /// # Panics
    /// Panics if `parent` does not belong to this graph.
    pub fn add(&mut self, parent: DeclId, mut decl: Decl) -> DeclId {
        assert!(
            (parent.0 as usize) < self.decls.len(),
            "parent {parent:?} is not part of this graph"
        );
        let id = DeclId::new(self.decls.len() as u32);
        decl.parent = Some(parent);
        decl.children.clear();
        self.decls.push(decl);
        self.decls[parent.0 as usize].children.push(id);
        id
    }

    pub fn add_namespace(&mut self, parent: DeclId, name: &str) -> DeclId {
        self.add(
            parent,
            Decl::new(name, DeclKind::Container(ContainerKind::Namespace), Linkage::External),
        )
    }

    pub fn add_record(&mut self, parent: DeclId, name: &str) -> DeclId {
        self.add(
            parent,
            Decl::new(name, DeclKind::Container(ContainerKind::Record), Linkage::External),
        )
    }

    /// Add a function; it is a definition when `body` is given.
    pub fn add_function(
        &mut self,
        parent: DeclId,
        name: &str,
        signature: &str,
        body: Option<&str>,
        linkage: Linkage,
    ) -> DeclId {
        let kind = DeclKind::Function {
            signature: SmolStr::new(signature),
            body: body.map(Body::new),
        };
        self.add(parent, Decl::new(name, kind, linkage))
    }

    pub fn add_other(&mut self, parent: DeclId, name: &str, linkage: Linkage) -> DeclId {
        self.add(parent, Decl::new(name, DeclKind::Other, linkage))
    }

    pub fn children(&self, id: DeclId) -> &[DeclId] {
        self.get(id).map(Decl::children).unwrap_or(&[])
    }

    pub fn parent(&self, id: DeclId) -> Option<DeclId> {
        self.get(id).and_then(Decl::parent)
    }

    /// Enclosing declarations, nearest first, ending with the root.
    pub fn ancestors(&self, id: DeclId) -> impl Iterator<Item = DeclId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    pub fn has_body(&self, id: DeclId) -> bool {
        self.get(id).is_some_and(Decl::is_definition)
    }

    /// `ns::Record::name`, skipping the translation unit root.
    pub fn qualified_name(&self, id: DeclId) -> String {
        let mut parts: Vec<&str> = self
            .ancestors(id)
            .filter(|&a| a != DeclId::ROOT)
            .filter_map(|a| self.get(a).map(|d| d.name.as_str()))
            .collect();
        parts.reverse();
        if let Some(decl) = self.get(id) {
            parts.push(decl.name.as_str());
        }
        parts.join("::")
    }

    /// Number of declarations, root included.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// A graph is never truly empty; this reports whether it holds only its root.
    pub fn is_empty(&self) -> bool {
        self.decls.len() <= 1
    }

    /// Iterate over all declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Decl)> + '_ {
        self.decls
            .iter()
            .enumerate()
            .map(|(i, d)| (DeclId::new(i as u32), d))
    }

    /// Check the structural invariants of a graph that did not come from
    /// [`DeclGraph::add`] (e.g. a deserialized snapshot).
    pub fn validate(&self) -> Result<(), String> {
        let Some(root) = self.decls.first() else {
            return Err("graph has no root".to_string());
        };
        if root.kind != DeclKind::Container(ContainerKind::TranslationUnit) || root.parent.is_some()
        {
            return Err("root is not a translation unit".to_string());
        }
        for (id, decl) in self.iter() {
            if id != DeclId::ROOT {
                match decl.parent.and_then(|p| self.get(p)) {
                    Some(parent) if parent.children.contains(&id) => {}
                    _ => return Err(format!("{id:?} is not listed by its parent")),
                }
            }
            for &child in &decl.children {
                match self.get(child) {
                    Some(c) if c.parent == Some(id) => {}
                    _ => return Err(format!("{id:?} lists foreign child {child:?}")),
                }
            }
        }
        Ok(())
    }
}

impl std::ops::Index<DeclId> for DeclGraph {
    type Output = Decl;

    fn index(&self, id: DeclId) -> &Decl {
        &self.decls[id.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DeclGraph, DeclId, DeclId) {
        let mut graph = DeclGraph::new();
        let ns = graph.add_namespace(graph.root(), "geo");
        let rec = graph.add_record(ns, "Point");
        let f = graph.add_function(rec, "norm", "", Some("{ return 0; }"), Linkage::External);
        (graph, ns, f)
    }

    #[test]
    fn test_graph_links() {
        let (graph, ns, f) = sample();

        assert_eq!(graph.len(), 4);
        assert_eq!(graph.children(graph.root()), &[ns]);
        assert_eq!(graph.ancestors(f).last(), Some(DeclId::ROOT));
        assert_eq!(graph.ancestors(f).count(), 3);
    }

    #[test]
    fn test_qualified_name() {
        let (graph, ns, f) = sample();

        assert_eq!(graph.qualified_name(ns), "geo");
        assert_eq!(graph.qualified_name(f), "geo::Point::norm");
        assert_eq!(graph.qualified_name(graph.root()), "");
    }

    #[test]
    fn test_definition_requires_body() {
        let mut graph = DeclGraph::new();
        let decl = graph.add_function(graph.root(), "f", "I", None, Linkage::External);
        let def = graph.add_function(graph.root(), "f", "I", Some("{}"), Linkage::External);

        assert!(!graph.has_body(decl));
        assert!(graph.has_body(def));
        assert!(!graph.has_body(DeclId::new(99)));
    }

    #[test]
    fn test_validate_accepts_built_graph() {
        let (graph, _, _) = sample();
        assert!(graph.validate().is_ok());
        assert!(DeclGraph::new().is_empty());
    }

    #[test]
    fn test_validate_rejects_broken_links() {
        let (mut graph, ns, _) = sample();
        graph.decls[ns.0 as usize].children.push(DeclId::new(42));

        assert!(graph.validate().is_err());
    }
}
