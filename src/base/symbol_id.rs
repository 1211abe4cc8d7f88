//! Stable symbol identifiers.

use smol_str::SmolStr;
use std::borrow::Borrow;
use std::fmt;

/// A deterministic string key for a definable entity.
///
/// The same `SymbolId` is produced for a declaration and every one of its
/// re-declarations, which is what lets a bodiless declaration in one unit
/// find its definition in another. Equality is exact string equality; the
/// contents are never interpreted.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SymbolId(SmolStr);

impl SymbolId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(SmolStr::new(id))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// An empty id means no stable key could be computed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({:?})", self.0.as_str())
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SymbolId {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for SymbolId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SymbolId {
    fn from(id: String) -> Self {
        Self(SmolStr::from(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[test]
    fn test_symbol_id_lookup_by_str() {
        let mut map = FxHashMap::default();
        map.insert(SymbolId::new("c:@F@f#I#"), 1);

        assert_eq!(map.get("c:@F@f#I#"), Some(&1));
        assert_eq!(map.get("c:@F@f#"), None);
    }

    #[test]
    fn test_symbol_id_empty() {
        assert!(SymbolId::new("").is_empty());
        assert!(!SymbolId::from("x").is_empty());
    }
}
