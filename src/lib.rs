//! quay: a build-server-backed project synchronization engine.
//!
//! Quay imports a workspace described by an external build server into an
//! IDE-style project model. One sync runs three phases:
//!
//! 1. **Query**: the orchestrator fans the protocol calls out in
//!    parallel, each optional call gated on an advertised server
//!    capability, and assembles the answers into an immutable
//!    [`core::graph::TargetGraph`].
//! 2. **Transform**: per-language transformers turn each target plus its
//!    resolved dependency closure into a [`core::descriptor::ModuleDescriptor`].
//! 3. **Apply**: the updater diffs the descriptors against the committed
//!    entity graph and applies the result as one atomic transaction,
//!    reusing unchanged entities.
//!
//! The engine is deterministic (identical server answers produce an
//! identical entity graph) and idempotent (re-running a sync is a no-op
//! diff). The wire transport, server lifecycle and any UI live outside
//! this crate, behind [`server::BuildServerClient`],
//! [`apply::EntityStore`] and [`sync::ProgressSink`].

pub mod apply;
pub mod core;
pub mod resolver;
pub mod server;
pub mod sync;
pub mod transform;
pub mod util;

#[cfg(test)]
pub mod test_support;

pub use crate::apply::{AppliedDiff, EntityStore, InMemoryEntityStore};
pub use crate::core::descriptor::{ModuleDescriptor, ModuleKind};
pub use crate::core::graph::TargetGraph;
pub use crate::core::ids::{LibraryId, TargetId};
pub use crate::server::{BuildServerClient, ServerCapabilities};
pub use crate::sync::{
    sync_project, CancelToken, SyncConfig, SyncContext, SyncError, SyncOutcome, SyncReport,
};
