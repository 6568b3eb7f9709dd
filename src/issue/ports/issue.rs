//! Repository port for issue persistence and lookup.

use crate::issue::domain::{Issue, IssueId, IssueStatus, IssueVersion, StatusLogEntry};
use crate::tenancy::domain::{ChannelId, ProjectId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for issue repository operations.
pub type IssueRepositoryResult<T> = Result<T, IssueRepositoryError>;

/// Offset/limit window over a newest-first listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Number of records to skip.
    pub offset: usize,
    /// Maximum number of records to return.
    pub limit: usize,
}

impl PageRequest {
    /// Creates a page request.
    #[must_use]
    pub const fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }
}

/// Issue persistence contract.
///
/// Writes that change an issue's status also append to the status log, and
/// both must become visible together or not at all.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Stores a newly reported issue together with its opening log entry.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::DuplicateIssue`] when the identifier
    /// already exists.
    async fn store(&self, issue: &Issue, opening: &StatusLogEntry) -> IssueRepositoryResult<()>;

    /// Persists field edits that do not change the status.
    ///
    /// The write only applies while the stored version equals
    /// `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::NotFound`] when the issue is absent or
    /// [`IssueRepositoryError::ConcurrentModification`] when the stored
    /// version has moved on.
    async fn update(&self, issue: &Issue, expected_version: IssueVersion)
    -> IssueRepositoryResult<()>;

    /// Persists a status change and its log entries in one unit.
    ///
    /// # Errors
    ///
    /// Same as [`IssueRepository::update`]. On error neither the issue row
    /// nor any log entry is written.
    async fn commit_transition(
        &self,
        issue: &Issue,
        expected_version: IssueVersion,
        entries: &[StatusLogEntry],
    ) -> IssueRepositoryResult<()>;

    /// Finds an issue by identifier.
    ///
    /// Returns `None` when the issue does not exist.
    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>>;

    /// Returns issues currently in `status`, newest first.
    async fn find_by_status(&self, status: IssueStatus) -> IssueRepositoryResult<Vec<Issue>>;

    /// Returns issues reported from `channel_id`, newest first.
    async fn find_by_channel(&self, channel_id: ChannelId) -> IssueRepositoryResult<Vec<Issue>>;

    /// Returns issues filed under `project_id`, newest first.
    async fn find_by_project(&self, project_id: ProjectId) -> IssueRepositoryResult<Vec<Issue>>;

    /// Returns one page of all issues, newest first.
    async fn list(&self, page: PageRequest) -> IssueRepositoryResult<Vec<Issue>>;
}

/// Errors returned by issue repository implementations.
#[derive(Debug, Clone, Error)]
pub enum IssueRepositoryError {
    /// An issue with the same identifier already exists.
    #[error("duplicate issue identifier: {0}")]
    DuplicateIssue(IssueId),

    /// The issue was not found.
    #[error("issue not found: {0}")]
    NotFound(IssueId),

    /// The stored version differs from the one the caller read.
    #[error(
        "issue {issue_id} was modified concurrently: expected version {expected_version}, found {actual_version}"
    )]
    ConcurrentModification {
        /// Issue that was modified.
        issue_id: IssueId,
        /// Version the caller based its change on.
        expected_version: IssueVersion,
        /// Version currently stored.
        actual_version: IssueVersion,
    },

    /// Stored data could not be mapped back into the domain.
    #[error("invalid persisted issue data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IssueRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a row-mapping error.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }
}
