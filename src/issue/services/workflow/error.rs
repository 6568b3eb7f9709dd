//! Failure taxonomy surfaced by the issue workflow service.

use crate::issue::services::AssignmentRegistryError;
use crate::issue::{
    domain::{AssigneeRole, IssueDomainError, IssueId, IssueStatus, IssueVersion},
    ports::{IssueRepositoryError, UserDirectoryError},
};
use crate::tenancy::domain::{ChannelId, UserId};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`IssueWorkflowService`](super::IssueWorkflowService).
#[derive(Debug, Clone, Error)]
pub enum WorkflowError {
    /// The issue does not exist.
    #[error("issue not found: {0}")]
    IssueNotFound(IssueId),

    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The user does not hold the role on the issue.
    #[error("user {user_id} is not assigned to issue {issue_id} as {role}")]
    AssignmentNotFound {
        /// Issue that was looked up.
        issue_id: IssueId,
        /// User that was looked up.
        user_id: UserId,
        /// Role that was looked up.
        role: AssigneeRole,
    },

    /// The channel has been deactivated.
    #[error("channel {0} is not active")]
    ChannelInactive(ChannelId),

    /// The workflow table forbids the requested status change.
    #[error("issue {issue_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Issue whose transition was rejected.
        issue_id: IssueId,
        /// Status the issue held.
        from: IssueStatus,
        /// Status that was requested.
        to: IssueStatus,
    },

    /// The status name is not part of the workflow.
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// The priority name is not one of `low`, `medium`, `high`.
    #[error("invalid priority: {0}")]
    InvalidPriority(String),

    /// The role name is not one of `dev`, `qa`, `reviewer`, `other`.
    #[error("invalid assignee role: {0}")]
    InvalidRole(String),

    /// The report payload failed validation.
    #[error(transparent)]
    InvalidReport(IssueDomainError),

    /// The id prefix is shorter than the configured minimum.
    #[error("id prefix {supplied:?} is shorter than {minimum} characters")]
    PartialIdTooShort {
        /// Prefix the caller supplied.
        supplied: String,
        /// Configured minimum length.
        minimum: usize,
    },

    /// The issue changed after the caller read it.
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

    /// A status change failed and the assignment created for it could not
    /// be removed.
    #[error("{error} (assignment rollback failed: {rollback})")]
    RollbackFailed {
        /// Failure that aborted the status change.
        #[source]
        error: Arc<WorkflowError>,
        /// Failure raised while removing the assignment.
        rollback: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// A repository failed.
    #[error("storage failure: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkflowError {
    /// Returns whether re-reading the issue and retrying may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConcurrentModification { .. } => true,
            Self::RollbackFailed { error, .. } => error.is_retryable(),
            _ => false,
        }
    }

    fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}

/// Result type for workflow service operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

impl From<IssueDomainError> for WorkflowError {
    fn from(err: IssueDomainError) -> Self {
        match err {
            IssueDomainError::InvalidTransition { issue_id, from, to } => {
                Self::InvalidTransition { issue_id, from, to }
            }
            IssueDomainError::InvalidStatus(value) => Self::InvalidStatus(value),
            IssueDomainError::InvalidPriority(value) => Self::InvalidPriority(value),
            IssueDomainError::InvalidRole(value) => Self::InvalidRole(value),
            IssueDomainError::InactiveChannel(channel_id) => Self::ChannelInactive(channel_id),
            other @ (IssueDomainError::InvalidSource(_)
            | IssueDomainError::EmptyTitle
            | IssueDomainError::EmptyDescription) => Self::InvalidReport(other),
        }
    }
}

impl From<IssueRepositoryError> for WorkflowError {
    fn from(err: IssueRepositoryError) -> Self {
        match err {
            IssueRepositoryError::NotFound(issue_id) => Self::IssueNotFound(issue_id),
            IssueRepositoryError::ConcurrentModification {
                issue_id,
                expected_version,
                actual_version,
            } => Self::ConcurrentModification {
                issue_id,
                expected_version,
                actual_version,
            },
            other @ (IssueRepositoryError::DuplicateIssue(_)
            | IssueRepositoryError::InvalidPersistedData(_)
            | IssueRepositoryError::Persistence(_)) => Self::storage(other),
        }
    }
}

impl From<UserDirectoryError> for WorkflowError {
    fn from(err: UserDirectoryError) -> Self {
        Self::storage(err)
    }
}

impl From<AssignmentRegistryError> for WorkflowError {
    fn from(err: AssignmentRegistryError) -> Self {
        match err {
            AssignmentRegistryError::UserNotFound(user_id) => Self::UserNotFound(user_id),
            AssignmentRegistryError::AssignmentNotFound {
                issue_id,
                user_id,
                role,
            } => Self::AssignmentNotFound {
                issue_id,
                user_id,
                role,
            },
            AssignmentRegistryError::InvalidRole(value) => Self::InvalidRole(value),
            other @ (AssignmentRegistryError::Repository(_)
            | AssignmentRegistryError::Directory(_)) => Self::storage(other),
        }
    }
}
