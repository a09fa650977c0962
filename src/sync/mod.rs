//! The sync pipeline.
//!
//! `sync_project` runs the three phases end to end: query the build
//! server for the workspace snapshot, transform every target into module
//! descriptors, and apply the descriptors to the host entity store as one
//! atomic transaction. Cancellation is checked between phases; a
//! cancelled sync commits nothing.

pub mod cancel;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod progress;

use std::sync::Arc;
use std::time::Instant;

use crate::apply::{self, AppliedDiff, EntityStore};
use crate::server::client::BuildServerClient;
use crate::transform::{self, LabelNamer, ModuleNamer, TransformerRegistry};

pub use cancel::CancelToken;
pub use config::SyncConfig;
pub use error::SyncError;
pub use orchestrator::{fetch_target_graph, QueryOutcome, SyncReport};
pub use progress::{NoopProgress, ProgressSink, SyncEvent};

/// Everything one sync run needs besides the server and the store.
pub struct SyncContext {
    pub config: SyncConfig,
    pub namer: Arc<dyn ModuleNamer>,
    pub progress: Arc<dyn ProgressSink>,
    pub cancel: CancelToken,
}

impl SyncContext {
    /// A context with the default namer, no progress sink and a fresh
    /// cancellation token.
    pub fn new(config: SyncConfig) -> Self {
        SyncContext {
            config,
            namer: Arc::new(LabelNamer),
            progress: Arc::new(NoopProgress),
            cancel: CancelToken::new(),
        }
    }

    /// Replace the module naming function.
    pub fn with_namer(mut self, namer: Arc<dyn ModuleNamer>) -> Self {
        self.namer = namer;
        self
    }

    /// Attach a progress sink.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Share an externally owned cancellation token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Result of one completed sync.
#[derive(Debug)]
pub struct SyncOutcome {
    /// How each query ended.
    pub report: SyncReport,
    /// What the apply transaction changed.
    pub diff: AppliedDiff,
}

/// Run one full sync against a connected server, committing the result
/// into the store.
///
/// Re-running over identical server answers is a no-op on the store: every
/// entity is reused and the diff reports zero changes.
pub fn sync_project(
    ctx: &SyncContext,
    client: Arc<dyn BuildServerClient>,
    store: &mut dyn EntityStore,
) -> Result<SyncOutcome, SyncError> {
    let started = Instant::now();
    ctx.progress.event(SyncEvent::started());

    let result = run_phases(ctx, client, store);

    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(outcome) => {
            tracing::info!(
                duration_ms,
                modules = outcome.diff.modules.len(),
                added = outcome.diff.added,
                updated = outcome.diff.updated,
                reused = outcome.diff.reused,
                removed = outcome.diff.removed,
                "sync finished"
            );
            ctx.progress.event(SyncEvent::finished(
                true,
                duration_ms,
                Some(outcome.diff.modules.len() as u64),
            ));
        }
        Err(err) => {
            tracing::warn!(duration_ms, error = %err, "sync failed");
            ctx.progress.event(SyncEvent::finished(false, duration_ms, None));
        }
    }
    result
}

fn run_phases(
    ctx: &SyncContext,
    client: Arc<dyn BuildServerClient>,
    store: &mut dyn EntityStore,
) -> Result<SyncOutcome, SyncError> {
    let (graph, report) = orchestrator::fetch_target_graph(ctx, &client)?;
    tracing::info!(
        targets = graph.target_count(),
        root = graph.root_target().is_some(),
        "target graph assembled"
    );

    if ctx.cancel.is_cancelled() {
        return Err(SyncError::Cancelled);
    }

    let registry = TransformerRegistry::new();
    let transform_started = Instant::now();
    ctx.progress
        .event(SyncEvent::subtask_started(orchestrator::subtask::TRANSFORM));
    let transformed = transform::transform_all(&ctx.config, ctx.namer.as_ref(), &registry, &graph);
    ctx.progress.event(SyncEvent::subtask_finished(
        orchestrator::subtask::TRANSFORM,
        transformed.is_ok(),
        transform_started.elapsed().as_millis() as u64,
    ));
    let descriptors = transformed?;

    // A cancellation observed here must not commit a partial graph.
    if ctx.cancel.is_cancelled() {
        return Err(SyncError::Cancelled);
    }

    let apply_started = Instant::now();
    ctx.progress
        .event(SyncEvent::subtask_started(orchestrator::subtask::APPLY));
    let applied = apply::apply(store, &descriptors);
    ctx.progress.event(SyncEvent::subtask_finished(
        orchestrator::subtask::APPLY,
        applied.is_ok(),
        apply_started.elapsed().as_millis() as u64,
    ));
    let diff = applied?;

    Ok(SyncOutcome { report, diff })
}
