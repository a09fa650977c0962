//! Core data structures for the sync engine.
//!
//! This module contains the foundational types used throughout the crate:
//! - Interned identifiers (TargetId, LibraryId)
//! - Targets and prebuilt library records as fetched from the server
//! - The per-sync target graph snapshot
//! - IDE-facing module descriptors

pub mod descriptor;
pub mod graph;
pub mod ids;
pub mod library;
pub mod target;

pub use descriptor::{AttachedLibrary, ModuleDescriptor, ModuleKind, SdkHint, SourceRoot};
pub use graph::{
    GraphParts, SourceItem, SourceItemKind, TargetGraph, TargetSources, WorkspaceDirectories,
};
pub use ids::{LibraryId, TargetId};
pub use library::LibraryRecord;
pub use target::{AndroidTargetType, BuildTarget, LanguageData, LanguageTag, TargetCapabilities};
