//! Sync configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for one sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Project base path. Roots outside it are filtered out, and the
    /// target whose base directory equals it is the root target.
    pub base_path: PathBuf,

    /// Deadline for waiting on each individual query result. `None` waits
    /// indefinitely (the client's own transport timeout still applies).
    pub query_timeout: Option<Duration>,

    /// Worker count for the parallel transform pass. `None` uses the
    /// default pool.
    pub transform_jobs: Option<usize>,
}

impl SyncConfig {
    /// Create a config for a project base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        SyncConfig {
            base_path: base_path.into(),
            query_timeout: None,
            transform_jobs: None,
        }
    }

    /// Set the per-query deadline.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Set the transform worker count.
    pub fn with_transform_jobs(mut self, jobs: usize) -> Self {
        self.transform_jobs = Some(jobs);
        self
    }

    /// The project base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
