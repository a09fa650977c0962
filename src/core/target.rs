//! Build targets as described by the build server.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::ids::TargetId;
use crate::util::Symbol;

/// Capability flags advertised per target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCapabilities {
    pub can_compile: bool,
    pub can_run: bool,
    pub can_test: bool,
    pub can_debug: bool,
}

impl TargetCapabilities {
    /// Capabilities of a plain compilable target.
    pub fn compile_only() -> Self {
        TargetCapabilities {
            can_compile: true,
            ..Default::default()
        }
    }
}

/// Language tags attached to a target by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    Java,
    Kotlin,
    Scala,
    Python,
    Go,
    Android,
}

impl LanguageTag {
    /// Parse a server-reported language id. Unknown ids yield `None` and
    /// are dropped by the caller.
    pub fn parse(id: &str) -> Option<Self> {
        match id {
            "java" => Some(LanguageTag::Java),
            "kotlin" => Some(LanguageTag::Kotlin),
            "scala" => Some(LanguageTag::Scala),
            "python" => Some(LanguageTag::Python),
            "go" => Some(LanguageTag::Go),
            "android" => Some(LanguageTag::Android),
            _ => None,
        }
    }
}

/// Language-specific sidecar data attached to a target.
///
/// Every field inside a variant is optional where the server may omit it;
/// transformers substitute empty values rather than fail, except where a
/// field is structurally required (the Go import path).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LanguageData {
    Scala {
        compiler_version: Option<semver::Version>,
        compiler_jars: Vec<PathBuf>,
    },
    Python {
        interpreter: Option<PathBuf>,
        version: Option<semver::Version>,
    },
    Go {
        import_path: Option<String>,
        sdk_home: Option<PathBuf>,
    },
    Android {
        target_type: AndroidTargetType,
        manifest: Option<PathBuf>,
    },
}

/// Kind of Android target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AndroidTargetType {
    App,
    Library,
    Test,
}

/// A build-tool-described compilation or runnable unit.
///
/// Immutable once fetched; one sync never mutates a target after the
/// target graph is assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildTarget {
    /// Globally unique opaque label.
    pub id: TargetId,

    /// Server-reported target kind (e.g. "java_library").
    pub kind: String,

    /// Language tags, in server order.
    pub languages: Vec<LanguageTag>,

    /// Per-target capability flags.
    pub capabilities: TargetCapabilities,

    /// Declared dependency ids. May name targets or libraries; resolution
    /// happens against the target graph, not here.
    pub dependencies: Vec<Symbol>,

    /// Base directory of the target.
    pub base_directory: PathBuf,

    /// Language-specific sidecar data, if the server attached any.
    pub data: Option<LanguageData>,
}

impl BuildTarget {
    /// Create a target with the given id and base directory.
    pub fn new(id: TargetId, base_directory: impl Into<PathBuf>) -> Self {
        BuildTarget {
            id,
            kind: String::new(),
            languages: Vec::new(),
            capabilities: TargetCapabilities::default(),
            dependencies: Vec::new(),
            base_directory: base_directory.into(),
            data: None,
        }
    }

    /// Set the target kind.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Set the language tags.
    pub fn with_languages(mut self, languages: Vec<LanguageTag>) -> Self {
        self.languages = languages;
        self
    }

    /// Set the capability flags.
    pub fn with_capabilities(mut self, capabilities: TargetCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Set the declared dependency ids.
    pub fn with_dependencies(mut self, ids: Vec<Symbol>) -> Self {
        self.dependencies = ids;
        self
    }

    /// Attach language-specific sidecar data.
    pub fn with_data(mut self, data: LanguageData) -> Self {
        self.data = Some(data);
        self
    }

    /// Check whether the target carries a given language tag.
    pub fn has_language(&self, tag: LanguageTag) -> bool {
        self.languages.contains(&tag)
    }
}
