//! Identifiers for declarations inside a unit's graph.

use std::fmt;

/// A graph-local declaration identifier.
///
/// These are assigned sequentially as declarations are added to a
/// [`DeclGraph`](super::DeclGraph). A `DeclId` only means something together
/// with the graph that produced it: the same number in a foreign unit and in
/// the destination unit names unrelated declarations.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "interchange", serde(transparent))]
pub struct DeclId(pub u32);

impl DeclId {
    /// The root of every graph (the translation unit itself).
    pub const ROOT: DeclId = DeclId(0);

    /// Create a new DeclId.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

impl From<u32> for DeclId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decl_id_equality() {
        assert_eq!(DeclId::new(3), DeclId::from(3));
        assert_ne!(DeclId::new(3), DeclId::ROOT);
    }

    #[test]
    fn test_decl_id_size() {
        assert_eq!(std::mem::size_of::<DeclId>(), 4);
    }
}
