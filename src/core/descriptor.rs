//! IDE-facing module descriptors.
//!
//! A `ModuleDescriptor` is the fully-formed, immutable result of
//! transforming one target plus its dependency closure. It is recomputed on
//! every sync and replaced wholesale; nothing mutates a descriptor after
//! construction. Parent/child entity linkage is resolved later, inside the
//! updater's transaction.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::library::LibraryRecord;
use crate::core::target::{AndroidTargetType, BuildTarget, LanguageTag, TargetCapabilities};

/// Module kind, resolved at transform time from the target's language tags.
///
/// A closed set: transformers are registered per kind at startup rather
/// than discovered at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// Generic JVM module; also the fallback for untagged targets.
    Jvm,
    Java,
    Kotlin,
    Scala,
    Python,
    Go,
    Android,
}

impl ModuleKind {
    /// Classify a target into a module kind.
    ///
    /// Android wins over the JVM languages (an Android target usually also
    /// carries a java tag), then the more specific JVM language wins over
    /// plain Java. Targets without a recognized tag fall back to the
    /// generic JVM kind.
    pub fn classify(target: &BuildTarget) -> Self {
        if target.has_language(LanguageTag::Android) {
            ModuleKind::Android
        } else if target.has_language(LanguageTag::Go) {
            ModuleKind::Go
        } else if target.has_language(LanguageTag::Python) {
            ModuleKind::Python
        } else if target.has_language(LanguageTag::Scala) {
            ModuleKind::Scala
        } else if target.has_language(LanguageTag::Kotlin) {
            ModuleKind::Kotlin
        } else if target.has_language(LanguageTag::Java) {
            ModuleKind::Java
        } else {
            ModuleKind::Jvm
        }
    }
}

/// One source root of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRoot {
    /// Directory path of the root.
    pub path: PathBuf,

    /// Whether the sources under this root are generated.
    pub generated: bool,

    /// Inferred package/namespace prefix ("" when none applies).
    pub package_prefix: String,
}

/// A library attached to a module, as interface/class/source archive triples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedLibrary {
    pub name: String,
    pub interface_jars: Vec<PathBuf>,
    pub class_jars: Vec<PathBuf>,
    pub source_jars: Vec<PathBuf>,
}

impl AttachedLibrary {
    /// Build an attachment from a library record.
    pub fn from_record(record: &LibraryRecord) -> Self {
        AttachedLibrary {
            name: record.id.as_str().to_owned(),
            interface_jars: record.interface_jars.clone(),
            class_jars: record.class_jars.clone(),
            source_jars: record.source_jars.clone(),
        }
    }
}

/// SDK hint derived from language-specific sidecar data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SdkHint {
    Android {
        target_type: AndroidTargetType,
        manifest: Option<PathBuf>,
    },
    Python {
        interpreter: Option<PathBuf>,
        version: Option<semver::Version>,
    },
    Go {
        import_path: String,
        sdk_home: Option<PathBuf>,
    },
    Scala {
        compiler_version: Option<semver::Version>,
        compiler_jars: Vec<PathBuf>,
    },
}

/// The IDE-facing, language-typed representation of one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Stable module name, a pure function of the target id.
    pub name: String,

    /// Module kind.
    pub kind: ModuleKind,

    /// Names of sibling modules this module depends on, in closure
    /// traversal order.
    pub module_deps: Vec<String>,

    /// Ids of libraries this module depends on, in closure traversal order.
    pub library_deps: Vec<String>,

    /// Capability flags carried over from the target.
    pub capabilities: TargetCapabilities,

    /// Source roots, filtered to the project base path and deduplicated.
    pub source_roots: Vec<SourceRoot>,

    /// Resource roots, filtered and deduplicated like source roots.
    pub resource_roots: Vec<PathBuf>,

    /// Attached libraries (archive triples) for the library deps.
    pub libraries: Vec<AttachedLibrary>,

    /// Optional SDK hint (Android/Python/Go/Scala modules only).
    pub sdk_hint: Option<SdkHint>,

    /// Roots excluded from indexing. Populated only on the root module,
    /// which aggregates every target's declared output paths.
    pub excluded_roots: Vec<PathBuf>,
}

impl ModuleDescriptor {
    /// Create an empty descriptor with a name and kind.
    pub fn new(name: impl Into<String>, kind: ModuleKind) -> Self {
        ModuleDescriptor {
            name: name.into(),
            kind,
            module_deps: Vec::new(),
            library_deps: Vec::new(),
            capabilities: TargetCapabilities::default(),
            source_roots: Vec::new(),
            resource_roots: Vec::new(),
            libraries: Vec::new(),
            sdk_hint: None,
            excluded_roots: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::TargetId;

    fn tagged(tags: Vec<LanguageTag>) -> BuildTarget {
        BuildTarget::new(TargetId::new("//t:t"), "/w/t").with_languages(tags)
    }

    #[test]
    fn test_classify_precedence() {
        assert_eq!(
            ModuleKind::classify(&tagged(vec![LanguageTag::Java, LanguageTag::Android])),
            ModuleKind::Android
        );
        assert_eq!(
            ModuleKind::classify(&tagged(vec![LanguageTag::Java, LanguageTag::Kotlin])),
            ModuleKind::Kotlin
        );
        assert_eq!(
            ModuleKind::classify(&tagged(vec![LanguageTag::Scala, LanguageTag::Java])),
            ModuleKind::Scala
        );
        assert_eq!(
            ModuleKind::classify(&tagged(vec![LanguageTag::Java])),
            ModuleKind::Java
        );
    }

    #[test]
    fn test_classify_fallback_is_generic_jvm() {
        assert_eq!(ModuleKind::classify(&tagged(vec![])), ModuleKind::Jvm);
    }
}
