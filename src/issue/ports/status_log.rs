//! Repository port for the append-only status log.

use crate::issue::domain::{IssueId, StatusLogEntry, StatusLogId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for status log repository operations.
pub type StatusLogRepositoryResult<T> = Result<T, StatusLogRepositoryError>;

/// Status log persistence contract.
///
/// Entries are immutable once appended. There is no update or delete path.
#[async_trait]
pub trait StatusLogRepository: Send + Sync {
    /// Appends one entry.
    ///
    /// The transition is not validated here.
    ///
    /// # Errors
    ///
    /// Returns [`StatusLogRepositoryError::DuplicateEntry`] when the entry
    /// identifier already exists.
    async fn append(&self, entry: &StatusLogEntry) -> StatusLogRepositoryResult<()>;

    /// Returns the full history of one issue, newest first.
    async fn history_for(&self, issue_id: IssueId) -> StatusLogRepositoryResult<Vec<StatusLogEntry>>;

    /// Returns the latest `limit` entries across all issues, newest first.
    async fn recent(&self, limit: usize) -> StatusLogRepositoryResult<Vec<StatusLogEntry>>;
}

/// Errors returned by status log repository implementations.
#[derive(Debug, Clone, Error)]
pub enum StatusLogRepositoryError {
    /// An entry with the same identifier already exists.
    #[error("duplicate status log entry: {0}")]
    DuplicateEntry(StatusLogId),

    /// Stored data could not be mapped back into the domain.
    #[error("invalid persisted status log data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StatusLogRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a row-mapping error.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }
}
