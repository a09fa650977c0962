//! Typed payloads returned by the build-server protocol calls.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::graph::{TargetSources, WorkspaceDirectories};
use crate::core::ids::TargetId;
use crate::core::library::LibraryRecord;
use crate::core::target::BuildTarget;

/// Result of the mandatory target enumeration call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceTargetsResult {
    pub targets: Vec<BuildTarget>,
}

/// Result of the mandatory sources call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourcesResult {
    pub items: Vec<(TargetId, TargetSources)>,
}

/// Result of the resources call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourcesResult {
    pub items: Vec<(TargetId, Vec<PathBuf>)>,
}

/// Result of the dependency-sources call (source archives per target).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencySourcesResult {
    pub items: Vec<(TargetId, Vec<PathBuf>)>,
}

/// Result of the workspace libraries call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceLibrariesResult {
    pub libraries: Vec<LibraryRecord>,
}

/// Result of the workspace directories call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoriesResult {
    pub directories: WorkspaceDirectories,
}

/// Result of the output-paths call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputPathsResult {
    pub items: Vec<(TargetId, Vec<PathBuf>)>,
}

/// Result of the JVM binary jars call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JvmBinaryJarsResult {
    pub items: Vec<(TargetId, Vec<PathBuf>)>,
}

/// Result of a compiler-options call (javac or scalac): the classpath the
/// server would compile each target against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilerOptionsResult {
    pub items: Vec<(TargetId, Vec<PathBuf>)>,
}
