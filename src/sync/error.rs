//! The sync error taxonomy.
//!
//! Collaborator failure types (transport errors, host-store errors) never
//! cross component boundaries raw; they are translated into this taxonomy
//! at the orchestrator and updater seams. Optional-query failures are not
//! part of it: they are logged, the field defaults to empty, and the sync
//! continues.

use thiserror::Error;

use crate::core::ids::TargetId;
use crate::server::client::QueryFailure;

/// A sync-level failure.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A mandatory query (targets or sources) failed or timed out. No
    /// partial target graph is produced.
    #[error("mandatory query `{query}` failed")]
    MandatoryQueryFailed {
        query: &'static str,
        #[source]
        source: QueryFailure,
    },

    /// The sync-wide cancellation token fired. A distinguished non-error
    /// termination: nothing is committed, nothing is reported as broken.
    #[error("sync cancelled")]
    Cancelled,

    /// A target is missing a structurally required field. Fatal for that
    /// target only; the caller skips its module and continues.
    #[error("structurally invalid target `{target}`: {reason}")]
    StructurallyInvalidTarget { target: TargetId, reason: String },

    /// Staging or committing the entity transaction failed. The whole
    /// apply is discarded; the previously committed graph stays
    /// authoritative.
    #[error("entity transaction failed")]
    TransactionStagingFailed {
        #[source]
        source: anyhow::Error,
    },
}

impl SyncError {
    /// Classify a mandatory query failure: cancellation terminates the
    /// sync as `Cancelled`, anything else (including a timeout) is fatal.
    pub fn from_mandatory(query: &'static str, failure: QueryFailure) -> Self {
        if failure.is_cancelled() {
            SyncError::Cancelled
        } else {
            SyncError::MandatoryQueryFailed {
                query,
                source: failure,
            }
        }
    }
}
