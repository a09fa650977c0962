//! Sync progress events.
//!
//! Events are purely observational: a sync behaves identically whether the
//! sink records them, forwards them to a UI, or drops them on the floor.
//! The JSON schema is tagged by `reason` and should stay backwards
//! compatible; new fields may be added, existing ones not renamed.

use serde::Serialize;

/// A progress event emitted during a sync.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reason")]
pub enum SyncEvent {
    /// The sync started. Emitted before anything is known about the
    /// workspace; per-phase detail follows as sub-task events.
    #[serde(rename = "sync-started")]
    SyncStarted,

    /// A named sub-task (one query, the transform pass, the apply pass)
    /// started.
    #[serde(rename = "subtask-started")]
    SubtaskStarted {
        /// Stable sub-task id (e.g. "workspace-targets", "apply").
        id: String,
    },

    /// A named sub-task finished.
    #[serde(rename = "subtask-finished")]
    SubtaskFinished {
        id: String,
        success: bool,
        duration_ms: u64,
    },

    /// The sync finished.
    #[serde(rename = "sync-finished")]
    SyncFinished {
        success: bool,
        duration_ms: u64,
        /// Number of modules applied (absent on failure).
        #[serde(skip_serializing_if = "Option::is_none")]
        modules: Option<u64>,
    },
}

impl SyncEvent {
    /// Create a sync started event.
    pub fn started() -> Self {
        SyncEvent::SyncStarted
    }

    /// Create a sub-task started event.
    pub fn subtask_started(id: impl Into<String>) -> Self {
        SyncEvent::SubtaskStarted { id: id.into() }
    }

    /// Create a sub-task finished event.
    pub fn subtask_finished(id: impl Into<String>, success: bool, duration_ms: u64) -> Self {
        SyncEvent::SubtaskFinished {
            id: id.into(),
            success,
            duration_ms,
        }
    }

    /// Create a sync finished event.
    pub fn finished(success: bool, duration_ms: u64, modules: Option<u64>) -> Self {
        SyncEvent::SyncFinished {
            success,
            duration_ms,
            modules,
        }
    }

    /// Serialize this event to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Receiver for sync progress events.
pub trait ProgressSink: Send + Sync {
    /// Handle one event. Must not block the sync for long.
    fn event(&self, event: SyncEvent);
}

/// A sink that drops every event. The default when no UI is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn event(&self, _event: SyncEvent) {}
}
