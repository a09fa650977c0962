//! Capability-gated query orchestration.
//!
//! Issues the protocol calls for one sync, each optional call guarded by
//! its advertised capability, fans them out on worker threads against the
//! shared server handle, and gathers the results in a fixed, documented
//! order:
//!
//! 1. `workspace-targets` (mandatory, gathered first: the jvm-binary-jars
//!    gate needs to know whether the workspace has Java targets)
//! 2. `sources` (mandatory)
//! 3. `resources`
//! 4. `dependency-sources`
//! 5. `workspace-libraries`
//! 6. `workspace-directories`
//! 7. `output-paths`
//! 8. `jvm-binary-jars`
//! 9. `javac-options`, `scalac-options` (fallback: dispatched only when
//!    the libraries query did not run)
//!
//! A failed optional query is logged and its field defaults to empty; a
//! failed mandatory query aborts the sync with no partial target graph.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::Instant;

use indexmap::IndexMap;

use crate::core::graph::{GraphParts, TargetGraph};
use crate::core::ids::TargetId;
use crate::core::target::LanguageTag;
use crate::server::client::{BuildServerClient, QueryFailure, QueryResult};
use crate::server::payloads::CompilerOptionsResult;
use crate::sync::cancel::CancelToken;
use crate::sync::error::SyncError;
use crate::sync::progress::SyncEvent;
use crate::sync::SyncContext;

/// Stable sub-task ids, also used as query names in logs and errors.
pub mod subtask {
    pub const WORKSPACE_TARGETS: &str = "workspace-targets";
    pub const SOURCES: &str = "sources";
    pub const RESOURCES: &str = "resources";
    pub const DEPENDENCY_SOURCES: &str = "dependency-sources";
    pub const WORKSPACE_LIBRARIES: &str = "workspace-libraries";
    pub const WORKSPACE_DIRECTORIES: &str = "workspace-directories";
    pub const OUTPUT_PATHS: &str = "output-paths";
    pub const JVM_BINARY_JARS: &str = "jvm-binary-jars";
    pub const JAVAC_OPTIONS: &str = "javac-options";
    pub const SCALAC_OPTIONS: &str = "scalac-options";
    pub const TRANSFORM: &str = "transform";
    pub const APPLY: &str = "apply";
}

/// How one query ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    Succeeded,
    /// The guard capability was absent; the query was never issued.
    Gated,
    Failed,
    TimedOut,
    Cancelled,
}

impl QueryOutcome {
    fn from_failure(failure: &QueryFailure) -> Self {
        match failure {
            QueryFailure::Cancelled => QueryOutcome::Cancelled,
            QueryFailure::TimedOut => QueryOutcome::TimedOut,
            QueryFailure::Failed(_) => QueryOutcome::Failed,
        }
    }
}

/// Summary of the query phase: which queries ran, were gated off, or
/// failed. Observable in telemetry; never affects the sync result.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    outcomes: Vec<(&'static str, QueryOutcome)>,
}

impl SyncReport {
    fn record(&mut self, query: &'static str, outcome: QueryOutcome) {
        self.outcomes.push((query, outcome));
    }

    /// How a query ended, if it was part of this sync.
    pub fn outcome(&self, query: &str) -> Option<QueryOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| *name == query)
            .map(|(_, outcome)| *outcome)
    }

    /// All recorded outcomes, in gather order.
    pub fn outcomes(&self) -> &[(&'static str, QueryOutcome)] {
        &self.outcomes
    }
}

/// An in-flight query.
struct Pending<T> {
    name: &'static str,
    started: Instant,
    rx: mpsc::Receiver<QueryResult<T>>,
}

/// Dispatch one query on a worker thread against the shared handle.
fn dispatch<T, F>(
    ctx: &SyncContext,
    client: &Arc<dyn BuildServerClient>,
    name: &'static str,
    call: F,
) -> Pending<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn BuildServerClient, &CancelToken) -> QueryResult<T> + Send + 'static,
{
    ctx.progress.event(SyncEvent::subtask_started(name));
    let (tx, rx) = mpsc::channel();
    let client = Arc::clone(client);
    let cancel = ctx.cancel.clone();
    std::thread::spawn(move || {
        let result = if cancel.is_cancelled() {
            Err(QueryFailure::Cancelled)
        } else {
            call(client.as_ref(), &cancel)
        };
        // The gatherer may have timed out and dropped the receiver.
        let _ = tx.send(result);
    });
    Pending {
        name,
        started: Instant::now(),
        rx,
    }
}

/// Wait for one query result, applying the configured deadline.
fn wait<T>(ctx: &SyncContext, pending: Pending<T>) -> QueryResult<T> {
    let result = match ctx.config.query_timeout {
        Some(deadline) => match pending.rx.recv_timeout(deadline) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(QueryFailure::TimedOut),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(QueryFailure::Failed(anyhow::anyhow!("query worker died")))
            }
        },
        None => match pending.rx.recv() {
            Ok(result) => result,
            Err(_) => Err(QueryFailure::Failed(anyhow::anyhow!("query worker died"))),
        },
    };

    let elapsed = pending.started.elapsed();
    tracing::debug!(
        query = pending.name,
        elapsed_ms = elapsed.as_millis() as u64,
        success = result.is_ok(),
        "query gathered"
    );
    ctx.progress.event(SyncEvent::subtask_finished(
        pending.name,
        result.is_ok(),
        elapsed.as_millis() as u64,
    ));
    result
}

/// Gather a mandatory query; failure aborts the sync.
fn gather_mandatory<T>(
    ctx: &SyncContext,
    pending: Pending<T>,
    report: &mut SyncReport,
) -> Result<T, SyncError> {
    let name = pending.name;
    match wait(ctx, pending) {
        Ok(value) => {
            report.record(name, QueryOutcome::Succeeded);
            Ok(value)
        }
        Err(failure) => {
            report.record(name, QueryOutcome::from_failure(&failure));
            Err(SyncError::from_mandatory(name, failure))
        }
    }
}

/// Gather an optional query; failure defaults the field to `None`.
fn gather_optional<T>(
    ctx: &SyncContext,
    name: &'static str,
    pending: Option<Pending<T>>,
    report: &mut SyncReport,
) -> Option<T> {
    let Some(pending) = pending else {
        report.record(name, QueryOutcome::Gated);
        return None;
    };
    match wait(ctx, pending) {
        Ok(value) => {
            report.record(name, QueryOutcome::Succeeded);
            Some(value)
        }
        Err(failure) => {
            tracing::warn!(query = name, error = %failure, "optional query failed");
            report.record(name, QueryOutcome::from_failure(&failure));
            None
        }
    }
}

/// Run the query phase and assemble the target graph.
pub fn fetch_target_graph(
    ctx: &SyncContext,
    client: &Arc<dyn BuildServerClient>,
) -> Result<(TargetGraph, SyncReport), SyncError> {
    if ctx.cancel.is_cancelled() {
        return Err(SyncError::Cancelled);
    }

    let caps = client.capabilities();
    let mut report = SyncReport::default();

    // The two mandatory, ungated queries dispatch immediately.
    let targets_pending = dispatch(ctx, client, subtask::WORKSPACE_TARGETS, |c, t| {
        c.workspace_targets(t)
    });
    let sources_pending = dispatch(ctx, client, subtask::SOURCES, |c, t| c.sources(t));

    let targets = gather_mandatory(ctx, targets_pending, &mut report)?;
    let has_java_targets = targets
        .targets
        .iter()
        .any(|t| t.has_language(LanguageTag::Java));

    // Every gated query dispatches before any of them is gathered.
    let resources_pending = caps
        .resources_provider
        .then(|| dispatch(ctx, client, subtask::RESOURCES, |c, t| c.resources(t)));
    let dependency_sources_pending = caps.dependency_sources_provider.then(|| {
        dispatch(ctx, client, subtask::DEPENDENCY_SOURCES, |c, t| {
            c.dependency_sources(t)
        })
    });
    let libraries_pending = caps.workspace_libraries_provider.then(|| {
        dispatch(ctx, client, subtask::WORKSPACE_LIBRARIES, |c, t| {
            c.workspace_libraries(t)
        })
    });
    let directories_pending = caps.workspace_directories_provider.then(|| {
        dispatch(ctx, client, subtask::WORKSPACE_DIRECTORIES, |c, t| {
            c.workspace_directories(t)
        })
    });
    let output_paths_pending = caps
        .output_paths_provider
        .then(|| dispatch(ctx, client, subtask::OUTPUT_PATHS, |c, t| c.output_paths(t)));
    let jvm_binary_jars_pending = (caps.android_support
        && caps.jvm_binary_jars_provider
        && has_java_targets)
        .then(|| {
            dispatch(ctx, client, subtask::JVM_BINARY_JARS, |c, t| {
                c.jvm_binary_jars(t)
            })
        });

    // Fallback rule: compiler-option queries are redundant (and more
    // expensive) when the libraries query runs, so they run only when it
    // does not.
    let (javac_pending, scalac_pending) = if libraries_pending.is_some() {
        (None, None)
    } else {
        (
            Some(dispatch(ctx, client, subtask::JAVAC_OPTIONS, |c, t| {
                c.javac_options(t)
            })),
            Some(dispatch(ctx, client, subtask::SCALAC_OPTIONS, |c, t| {
                c.scalac_options(t)
            })),
        )
    };

    // Gather in fixed order.
    let sources = gather_mandatory(ctx, sources_pending, &mut report)?;
    let resources = gather_optional(ctx, subtask::RESOURCES, resources_pending, &mut report);
    let dependency_sources = gather_optional(
        ctx,
        subtask::DEPENDENCY_SOURCES,
        dependency_sources_pending,
        &mut report,
    );
    let libraries = gather_optional(
        ctx,
        subtask::WORKSPACE_LIBRARIES,
        libraries_pending,
        &mut report,
    );
    let directories = gather_optional(
        ctx,
        subtask::WORKSPACE_DIRECTORIES,
        directories_pending,
        &mut report,
    );
    let output_paths = gather_optional(
        ctx,
        subtask::OUTPUT_PATHS,
        output_paths_pending,
        &mut report,
    );
    let jvm_binary_jars = gather_optional(
        ctx,
        subtask::JVM_BINARY_JARS,
        jvm_binary_jars_pending,
        &mut report,
    );
    let javac_options =
        gather_optional(ctx, subtask::JAVAC_OPTIONS, javac_pending, &mut report);
    let scalac_options =
        gather_optional(ctx, subtask::SCALAC_OPTIONS, scalac_pending, &mut report);

    if ctx.cancel.is_cancelled() {
        return Err(SyncError::Cancelled);
    }

    let parts = GraphParts {
        targets: targets.targets,
        sources: sources.items.into_iter().collect::<HashMap<_, _>>(),
        libraries: libraries.map(|r| r.libraries),
        resources: resources.map(|r| r.items.into_iter().collect()),
        dependency_sources: dependency_sources.map(|r| r.items.into_iter().collect()),
        directories: directories.map(|r| r.directories),
        output_paths: output_paths.map(|r| r.items.into_iter().collect()),
        jvm_binary_jars: jvm_binary_jars.map(|r| r.items.into_iter().collect()),
        inferred_classpaths: merge_classpaths(javac_options, scalac_options),
    };

    let graph = TargetGraph::assemble(ctx.config.base_path(), parts);
    Ok((graph, report))
}

/// Merge the javac and scalac classpaths per target, javac first.
fn merge_classpaths(
    javac: Option<CompilerOptionsResult>,
    scalac: Option<CompilerOptionsResult>,
) -> Option<Vec<(TargetId, Vec<PathBuf>)>> {
    if javac.is_none() && scalac.is_none() {
        return None;
    }
    let mut merged: IndexMap<TargetId, Vec<PathBuf>> = IndexMap::new();
    for result in [javac, scalac].into_iter().flatten() {
        for (target, jars) in result.items {
            merged.entry(target).or_default().extend(jars);
        }
    }
    Some(merged.into_iter().collect())
}
