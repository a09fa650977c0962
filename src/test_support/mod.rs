//! Shared fixtures for in-crate tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::core::graph::TargetSources;
use crate::core::ids::TargetId;
use crate::core::library::LibraryRecord;
use crate::core::target::BuildTarget;
use crate::server::capabilities::ServerCapabilities;
use crate::server::client::{BuildServerClient, QueryFailure, QueryResult};
use crate::server::payloads::{
    CompilerOptionsResult, DependencySourcesResult, DirectoriesResult, JvmBinaryJarsResult,
    OutputPathsResult, ResourcesResult, SourcesResult, WorkspaceLibrariesResult,
    WorkspaceTargetsResult,
};
use crate::sync::cancel::CancelToken;
use crate::sync::progress::{ProgressSink, SyncEvent};

/// How a scripted query should fail.
#[derive(Debug, Clone, Copy)]
pub enum FailureKind {
    Error,
    TimedOut,
}

/// Scriptable in-process server: canned answers per query, injectable
/// failures, and a record of which queries were issued.
#[derive(Default)]
pub struct MockServerClient {
    capabilities: ServerCapabilities,
    targets: WorkspaceTargetsResult,
    sources: SourcesResult,
    resources: ResourcesResult,
    dependency_sources: DependencySourcesResult,
    libraries: WorkspaceLibrariesResult,
    directories: DirectoriesResult,
    output_paths: OutputPathsResult,
    jvm_binary_jars: JvmBinaryJarsResult,
    javac_options: CompilerOptionsResult,
    scalac_options: CompilerOptionsResult,
    failures: HashMap<&'static str, FailureKind>,
    calls: Mutex<Vec<&'static str>>,
}

impl MockServerClient {
    pub fn new(capabilities: ServerCapabilities) -> Self {
        MockServerClient {
            capabilities,
            ..Default::default()
        }
    }

    pub fn with_targets(mut self, targets: Vec<BuildTarget>) -> Self {
        self.targets = WorkspaceTargetsResult { targets };
        self
    }

    pub fn with_sources(mut self, items: Vec<(TargetId, TargetSources)>) -> Self {
        self.sources = SourcesResult { items };
        self
    }

    pub fn with_resources(mut self, items: Vec<(TargetId, Vec<PathBuf>)>) -> Self {
        self.resources = ResourcesResult { items };
        self
    }

    pub fn with_libraries(mut self, libraries: Vec<LibraryRecord>) -> Self {
        self.libraries = WorkspaceLibrariesResult { libraries };
        self
    }

    pub fn with_javac_options(mut self, items: Vec<(TargetId, Vec<PathBuf>)>) -> Self {
        self.javac_options = CompilerOptionsResult { items };
        self
    }

    pub fn with_scalac_options(mut self, items: Vec<(TargetId, Vec<PathBuf>)>) -> Self {
        self.scalac_options = CompilerOptionsResult { items };
        self
    }

    /// Script the named query to fail.
    pub fn fail_with(mut self, query: &'static str, kind: FailureKind) -> Self {
        self.failures.insert(query, kind);
        self
    }

    /// Whether the named query was issued at least once.
    pub fn was_called(&self, query: &str) -> bool {
        self.calls
            .lock()
            .map(|calls| calls.iter().any(|c| *c == query))
            .unwrap_or(false)
    }

    fn respond<T: Clone>(&self, query: &'static str, value: &T, cancel: &CancelToken) -> QueryResult<T> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(query);
        }
        if cancel.is_cancelled() {
            return Err(QueryFailure::Cancelled);
        }
        match self.failures.get(query) {
            Some(FailureKind::Error) => {
                Err(QueryFailure::Failed(anyhow::anyhow!("scripted failure: {query}")))
            }
            Some(FailureKind::TimedOut) => Err(QueryFailure::TimedOut),
            None => Ok(value.clone()),
        }
    }
}

impl BuildServerClient for MockServerClient {
    fn capabilities(&self) -> ServerCapabilities {
        self.capabilities
    }

    fn workspace_targets(&self, cancel: &CancelToken) -> QueryResult<WorkspaceTargetsResult> {
        self.respond("workspace-targets", &self.targets, cancel)
    }

    fn sources(&self, cancel: &CancelToken) -> QueryResult<SourcesResult> {
        self.respond("sources", &self.sources, cancel)
    }

    fn resources(&self, cancel: &CancelToken) -> QueryResult<ResourcesResult> {
        self.respond("resources", &self.resources, cancel)
    }

    fn dependency_sources(&self, cancel: &CancelToken) -> QueryResult<DependencySourcesResult> {
        self.respond("dependency-sources", &self.dependency_sources, cancel)
    }

    fn workspace_libraries(&self, cancel: &CancelToken) -> QueryResult<WorkspaceLibrariesResult> {
        self.respond("workspace-libraries", &self.libraries, cancel)
    }

    fn workspace_directories(&self, cancel: &CancelToken) -> QueryResult<DirectoriesResult> {
        self.respond("workspace-directories", &self.directories, cancel)
    }

    fn output_paths(&self, cancel: &CancelToken) -> QueryResult<OutputPathsResult> {
        self.respond("output-paths", &self.output_paths, cancel)
    }

    fn jvm_binary_jars(&self, cancel: &CancelToken) -> QueryResult<JvmBinaryJarsResult> {
        self.respond("jvm-binary-jars", &self.jvm_binary_jars, cancel)
    }

    fn javac_options(&self, cancel: &CancelToken) -> QueryResult<CompilerOptionsResult> {
        self.respond("javac-options", &self.javac_options, cancel)
    }

    fn scalac_options(&self, cancel: &CancelToken) -> QueryResult<CompilerOptionsResult> {
        self.respond("scalac-options", &self.scalac_options, cancel)
    }
}

/// Progress sink that records every event for later assertions.
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<SyncEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ProgressSink for RecordingProgress {
    fn event(&self, event: SyncEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
