//! The build-server client seam.
//!
//! The wire transport and the server subprocess live outside this crate;
//! the sync engine sees only this trait. Every call either returns a typed
//! payload or fails with a classified [`QueryFailure`] so the orchestrator
//! can tell cancellation and timeouts apart from real errors.

use thiserror::Error;

use crate::server::capabilities::ServerCapabilities;
use crate::server::payloads::{
    CompilerOptionsResult, DependencySourcesResult, DirectoriesResult, JvmBinaryJarsResult,
    OutputPathsResult, ResourcesResult, SourcesResult, WorkspaceLibrariesResult,
    WorkspaceTargetsResult,
};
use crate::sync::cancel::CancelToken;

/// Classified failure of one protocol call.
#[derive(Debug, Error)]
pub enum QueryFailure {
    /// The sync-wide cancellation token fired while the call was pending.
    #[error("query cancelled")]
    Cancelled,

    /// The call did not answer within the configured deadline.
    #[error("query timed out")]
    TimedOut,

    /// The call failed for any other reason (transport, server error).
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl QueryFailure {
    /// Whether this failure is a cancellation (as opposed to an error).
    pub fn is_cancelled(&self) -> bool {
        matches!(self, QueryFailure::Cancelled)
    }
}

/// Result alias for protocol calls.
pub type QueryResult<T> = Result<T, QueryFailure>;

/// A connected build-server handle.
///
/// Implementations must tolerate concurrent calls on one handle: the
/// orchestrator fans the gated queries out on separate threads against the
/// same connection. Each call receives the sync-wide cancellation token and
/// must complete with [`QueryFailure::Cancelled`] rather than hang once the
/// token fires.
pub trait BuildServerClient: Send + Sync {
    /// The capability set this server advertised on connect.
    fn capabilities(&self) -> ServerCapabilities;

    /// Enumerate workspace targets. Mandatory: failure aborts the sync.
    fn workspace_targets(&self, cancel: &CancelToken) -> QueryResult<WorkspaceTargetsResult>;

    /// Fetch per-target sources. Mandatory: failure aborts the sync.
    fn sources(&self, cancel: &CancelToken) -> QueryResult<SourcesResult>;

    /// Fetch per-target resource roots. Gated on `resources_provider`.
    fn resources(&self, cancel: &CancelToken) -> QueryResult<ResourcesResult>;

    /// Fetch dependency source archives. Gated on
    /// `dependency_sources_provider`.
    fn dependency_sources(&self, cancel: &CancelToken) -> QueryResult<DependencySourcesResult>;

    /// Fetch workspace library records. Gated on
    /// `workspace_libraries_provider`.
    fn workspace_libraries(&self, cancel: &CancelToken) -> QueryResult<WorkspaceLibrariesResult>;

    /// Fetch workspace directory scoping. Gated on
    /// `workspace_directories_provider`.
    fn workspace_directories(&self, cancel: &CancelToken) -> QueryResult<DirectoriesResult>;

    /// Fetch per-target output paths. Gated on `output_paths_provider`.
    fn output_paths(&self, cancel: &CancelToken) -> QueryResult<OutputPathsResult>;

    /// Fetch per-target JVM binary jars. Gated on android support plus
    /// `jvm_binary_jars_provider` plus the workspace containing Java
    /// targets.
    fn jvm_binary_jars(&self, cancel: &CancelToken) -> QueryResult<JvmBinaryJarsResult>;

    /// Fetch javac classpaths. Fallback: runs only when the libraries
    /// query did not run.
    fn javac_options(&self, cancel: &CancelToken) -> QueryResult<CompilerOptionsResult>;

    /// Fetch scalac classpaths. Fallback: runs only when the libraries
    /// query did not run.
    fn scalac_options(&self, cancel: &CancelToken) -> QueryResult<CompilerOptionsResult>;
}
