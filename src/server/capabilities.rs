//! Server-advertised protocol capabilities.

use serde::{Deserialize, Serialize};

/// Capability set advertised by a connected build server.
///
/// Each flag guards one optional protocol call; the orchestrator consults
/// this set before dispatching. Target enumeration and sources are always
/// supported and have no flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub resources_provider: bool,
    pub dependency_sources_provider: bool,
    pub workspace_libraries_provider: bool,
    pub workspace_directories_provider: bool,
    pub output_paths_provider: bool,
    pub jvm_binary_jars_provider: bool,
    pub android_support: bool,
}

impl ServerCapabilities {
    /// A server that supports every optional call.
    pub fn all() -> Self {
        ServerCapabilities {
            resources_provider: true,
            dependency_sources_provider: true,
            workspace_libraries_provider: true,
            workspace_directories_provider: true,
            output_paths_provider: true,
            jvm_binary_jars_provider: true,
            android_support: true,
        }
    }
}
