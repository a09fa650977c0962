//! Target and library identifiers.
//!
//! The two id spaces are distinct even though a build server may emit the
//! same label text for a target and a prebuilt library. Keeping separate
//! newtypes makes it impossible to conflate them accidentally; the closure
//! resolver partitions raw ids by looking them up in the authoritative
//! target graph, never by inspecting the string.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::util::Symbol;

/// Identifier of a build target (an opaque label, globally unique).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(Symbol);

impl TargetId {
    /// Create a target id from a label string.
    pub fn new(label: impl AsRef<str>) -> Self {
        TargetId(Symbol::intern(label))
    }

    /// The raw interned symbol.
    #[inline]
    pub fn symbol(&self) -> Symbol {
        self.0
    }

    /// The label text.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.0.as_str()
    }
}

impl From<Symbol> for TargetId {
    fn from(sym: Symbol) -> Self {
        TargetId(sym)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Identifier of a prebuilt library record.
///
/// Lives in its own id space: a `LibraryId` may be textually equal to a
/// `TargetId` without referring to the same thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LibraryId(Symbol);

impl LibraryId {
    /// Create a library id from a label string.
    pub fn new(label: impl AsRef<str>) -> Self {
        LibraryId(Symbol::intern(label))
    }

    /// The raw interned symbol.
    #[inline]
    pub fn symbol(&self) -> Symbol {
        self.0
    }

    /// The label text.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.0.as_str()
    }
}

impl From<Symbol> for LibraryId {
    fn from(sym: Symbol) -> Self {
        LibraryId(sym)
    }
}

impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textual_collision_is_not_identity() {
        let target = TargetId::new("//lib:guava");
        let library = LibraryId::new("//lib:guava");
        // Same text, same underlying symbol, different types: the compiler
        // prevents comparing them directly.
        assert_eq!(target.as_str(), library.as_str());
        assert_eq!(target.symbol(), library.symbol());
    }

    #[test]
    fn test_display_is_label() {
        let id = TargetId::new("//server/app:main");
        assert_eq!(id.to_string(), "//server/app:main");
    }
}
