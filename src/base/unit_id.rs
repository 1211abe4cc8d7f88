//! Identifiers for loaded foreign units.

use std::fmt;

/// Identity of a loaded foreign unit.
///
/// `UnitId` is a lightweight handle (just a u32) assigned by the
/// [`UnitCache`](crate::project::UnitCache) when a unit snapshot is loaded.
/// It stays stable for the lifetime of the cache, so it is used as the key
/// for everything that must be tracked per foreign unit root (importers,
/// per-symbol memo entries).
///
/// Two loads of the same file in different sessions may produce different
/// ids; nothing relies on them matching.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct UnitId(pub u32);

impl UnitId {
    /// Create a new UnitId from a raw index.
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

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({})", self.0)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

impl From<u32> for UnitId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}
