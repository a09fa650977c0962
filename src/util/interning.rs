//! Interned identifier symbols.
//!
//! Target and library ids are compared constantly during closure resolution,
//! so they are stored as `Symbol`s: every distinct string is leaked into a
//! global pool exactly once, making equality a pointer comparison and cloning
//! free.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{LazyLock, RwLock};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

static POOL: LazyLock<RwLock<HashSet<&'static str>>> =
    LazyLock::new(|| RwLock::new(HashSet::new()));

/// An interned string symbol with O(1) equality and free cloning.
///
/// Two symbols interned from equal strings point at the same allocation,
/// so equality and hashing work on the pointer alone. Ordering is by string
/// content so that any sort over symbols is stable across processes.
#[derive(Clone, Copy)]
pub struct Symbol(&'static str);

impl Symbol {
    /// Intern a string, returning its canonical symbol.
    pub fn intern(s: impl AsRef<str>) -> Self {
        let s = s.as_ref();

        {
            let pool = POOL.read().unwrap();
            if let Some(&interned) = pool.get(s) {
                return Symbol(interned);
            }
        }

        let mut pool = POOL.write().unwrap();
        // Another thread may have interned it between the two locks.
        if let Some(&interned) = pool.get(s) {
            return Symbol(interned);
        }

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        pool.insert(leaked);
        Symbol(leaked)
    }

    /// Get the underlying string slice.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Check if the symbol is the empty string.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for Symbol {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.0.as_ptr() as usize).hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    // Order by content, never by pointer: pointer values vary per process
    // and would break deterministic ordering guarantees.
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(other.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl AsRef<str> for Symbol {
    #[inline]
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::intern(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Symbol::intern(s)
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Symbol::intern(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedup() {
        let a = Symbol::intern("//server/app:main");
        let b = Symbol::intern("//server/app:main");
        assert_eq!(a, b);
        assert!(std::ptr::eq(a.as_str(), b.as_str()));
    }

    #[test]
    fn test_distinct_symbols() {
        let a = Symbol::intern("//a:a");
        let b = Symbol::intern("//a:b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_ordering_by_content() {
        let mut syms = vec![
            Symbol::intern("zeta"),
            Symbol::intern("alpha"),
            Symbol::intern("mid"),
        ];
        syms.sort();
        let strs: Vec<_> = syms.iter().map(|s| s.as_str()).collect();
        assert_eq!(strs, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_serde_round_trip() {
        let sym = Symbol::intern("//lib:core");
        let json = serde_json::to_string(&sym).unwrap();
        assert_eq!(json, "\"//lib:core\"");
        let back: Symbol = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sym);
    }

    #[test]
    fn test_concurrent_intern() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| Symbol::intern("shared-id")))
            .collect();
        let syms: Vec<Symbol> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for pair in syms.windows(2) {
            assert_eq!(pair[0], pair[1]);
        }
    }
}
