//! Prebuilt library records.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::ids::LibraryId;

/// A build-tool-described prebuilt dependency unit.
///
/// Unlike targets, library dependencies are walked transitively during
/// closure resolution: a compiled artifact pulls in every artifact it was
/// built against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryRecord {
    /// Identifier in the library id space.
    pub id: LibraryId,

    /// Ids of other libraries this one depends on.
    pub dependencies: Vec<LibraryId>,

    /// Interface (ijar/ABI) archives.
    pub interface_jars: Vec<PathBuf>,

    /// Compiled class archives.
    pub class_jars: Vec<PathBuf>,

    /// Source archives. Empty unless the dependency-sources query ran.
    pub source_jars: Vec<PathBuf>,
}

impl LibraryRecord {
    /// Create a library record with no archives.
    pub fn new(id: LibraryId) -> Self {
        LibraryRecord {
            id,
            dependencies: Vec::new(),
            interface_jars: Vec::new(),
            class_jars: Vec::new(),
            source_jars: Vec::new(),
        }
    }

    /// Set the library dependencies.
    pub fn with_dependencies(mut self, ids: Vec<LibraryId>) -> Self {
        self.dependencies = ids;
        self
    }

    /// Set the class archives.
    pub fn with_class_jars(mut self, jars: Vec<PathBuf>) -> Self {
        self.class_jars = jars;
        self
    }

    /// Set the interface archives.
    pub fn with_interface_jars(mut self, jars: Vec<PathBuf>) -> Self {
        self.interface_jars = jars;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_builder() {
        let lib = LibraryRecord::new(LibraryId::new("@maven//:guava"))
            .with_dependencies(vec![LibraryId::new("@maven//:failureaccess")])
            .with_class_jars(vec![PathBuf::from("/cache/guava.jar")]);

        assert_eq!(lib.id.as_str(), "@maven//:guava");
        assert_eq!(lib.dependencies.len(), 1);
        assert!(lib.source_jars.is_empty());
    }
}
