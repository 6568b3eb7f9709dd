//! Repository port for role-tagged issue assignments.

use crate::issue::domain::{AssigneeRole, AssignmentId, IssueAssignment, IssueId};
use crate::tenancy::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for assignment repository operations.
pub type AssignmentRepositoryResult<T> = Result<T, AssignmentRepositoryError>;

/// Assignment persistence contract.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Stores a new assignment.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRepositoryError::DuplicateAssignment`] when the
    /// same issue, user and role are already linked.
    async fn create(&self, assignment: &IssueAssignment) -> AssignmentRepositoryResult<()>;

    /// Deletes one assignment.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRepositoryError::NotFound`] when the assignment
    /// does not exist.
    async fn delete(&self, id: AssignmentId) -> AssignmentRepositoryResult<()>;

    /// Deletes every assignment on an issue and returns how many were removed.
    async fn delete_all_for_issue(&self, issue_id: IssueId) -> AssignmentRepositoryResult<usize>;

    /// Finds the assignment linking `user_id` to `issue_id` with `role`.
    async fn find_by_triple(
        &self,
        issue_id: IssueId,
        user_id: UserId,
        role: AssigneeRole,
    ) -> AssignmentRepositoryResult<Option<IssueAssignment>>;

    /// Returns assignments on an issue, oldest first.
    async fn list_for_issue(&self, issue_id: IssueId)
    -> AssignmentRepositoryResult<Vec<IssueAssignment>>;

    /// Returns assignments held by a user, newest first.
    async fn list_for_user(&self, user_id: UserId)
    -> AssignmentRepositoryResult<Vec<IssueAssignment>>;

    /// Returns assignments on an issue with `role`, oldest first.
    async fn list_for_issue_and_role(
        &self,
        issue_id: IssueId,
        role: AssigneeRole,
    ) -> AssignmentRepositoryResult<Vec<IssueAssignment>>;
}

/// Errors returned by assignment repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AssignmentRepositoryError {
    /// The issue, user and role are already linked.
    #[error("user {user_id} is already assigned to issue {issue_id} as {role}")]
    DuplicateAssignment {
        /// Issue of the conflicting assignment.
        issue_id: IssueId,
        /// User of the conflicting assignment.
        user_id: UserId,
        /// Role of the conflicting assignment.
        role: AssigneeRole,
    },

    /// The assignment was not found.
    #[error("assignment not found: {0}")]
    NotFound(AssignmentId),

    /// Stored data could not be mapped back into the domain.
    #[error("invalid persisted assignment data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AssignmentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a row-mapping error.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }
}
