//! High-level IR: the declaration graph and the operations on it.
//!
//! - [`DeclGraph`] - Arena of declarations owned by one unit
//! - [`SymbolIdGenerator`] - Stable ids shared by declarations and definitions
//! - [`find_definition`] - Depth-first definition lookup in a loaded unit
//! - [`MergeImporter`], [`ImporterRegistry`] - Structural merge into the destination graph

mod decl;
mod ids;
mod import;
mod locate;
mod usr;

pub use decl::{Body, ContainerKind, Decl, DeclGraph, DeclKind, Linkage};
pub use ids::DeclId;
pub use import::{ImporterRegistry, MergeImporter, StructuralImporter};
pub use locate::find_definition;
pub use usr::{SymbolIdGenerator, UsrGenerator};
