//! Role-tagged assignment bookkeeping.

use crate::issue::{
    domain::{AssigneeRole, AssignmentRoster, IssueAssignment, IssueId},
    ports::{AssignmentRepository, AssignmentRepositoryError, UserDirectory, UserDirectoryError},
};
use crate::tenancy::domain::UserId;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`AssignmentRegistry`].
#[derive(Debug, Clone, Error)]
pub enum AssignmentRegistryError {
    /// The user to assign does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// No assignment links the user to the issue with the role.
    #[error("user {user_id} is not assigned to issue {issue_id} as {role}")]
    AssignmentNotFound {
        /// Issue that was looked up.
        issue_id: IssueId,
        /// User that was looked up.
        user_id: UserId,
        /// Role that was looked up.
        role: AssigneeRole,
    },

    /// The role name is not one of `dev`, `qa`, `reviewer`, `other`.
    #[error("invalid assignee role: {0}")]
    InvalidRole(String),

    /// The assignment store failed.
    #[error(transparent)]
    Repository(#[from] AssignmentRepositoryError),

    /// The user lookup failed.
    #[error(transparent)]
    Directory(#[from] UserDirectoryError),
}

/// Result type for assignment registry operations.
pub type AssignmentRegistryResult<T> = Result<T, AssignmentRegistryError>;

/// Tracks which users hold which roles on which issues.
#[derive(Clone)]
pub struct AssignmentRegistry<A, U, C>
where
    A: AssignmentRepository,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    assignments: Arc<A>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<A, U, C> AssignmentRegistry<A, U, C>
where
    A: AssignmentRepository,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a registry.
    #[must_use]
    pub const fn new(assignments: Arc<A>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            assignments,
            users,
            clock,
        }
    }

    /// Assigns `user_id` to `issue_id` with `role`.
    ///
    /// Assigning an existing triple again returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRegistryError::UserNotFound`] when the user is
    /// unknown, or a storage error.
    pub async fn assign(
        &self,
        issue_id: IssueId,
        user_id: UserId,
        role: AssigneeRole,
    ) -> AssignmentRegistryResult<IssueAssignment> {
        let (assignment, _) = self.assign_tracked(issue_id, user_id, role).await?;
        Ok(assignment)
    }

    /// Parses `role` and assigns.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRegistryError::InvalidRole`] before any store
    /// access when the role name is unknown. Otherwise as
    /// [`AssignmentRegistry::assign`].
    pub async fn assign_role_named(
        &self,
        issue_id: IssueId,
        user_id: UserId,
        role: &str,
    ) -> AssignmentRegistryResult<IssueAssignment> {
        let parsed = AssigneeRole::try_from(role)
            .map_err(|_| AssignmentRegistryError::InvalidRole(role.to_owned()))?;
        self.assign(issue_id, user_id, parsed).await
    }

    /// Assigns and reports whether a new record was created.
    pub(crate) async fn assign_tracked(
        &self,
        issue_id: IssueId,
        user_id: UserId,
        role: AssigneeRole,
    ) -> AssignmentRegistryResult<(IssueAssignment, bool)> {
        if self.users.find_user(user_id).await?.is_none() {
            return Err(AssignmentRegistryError::UserNotFound(user_id));
        }

        if let Some(existing) = self
            .assignments
            .find_by_triple(issue_id, user_id, role)
            .await?
        {
            return Ok((existing, false));
        }

        let assignment = IssueAssignment::new(issue_id, user_id, role, &*self.clock);
        match self.assignments.create(&assignment).await {
            Ok(()) => {
                tracing::debug!(
                    issue_id = %issue_id,
                    user_id = %user_id,
                    role = %role,
                    "assignment created"
                );
                Ok((assignment, true))
            }
            // Another request created the same triple between lookup and insert.
            Err(AssignmentRepositoryError::DuplicateAssignment { .. }) => self
                .assignments
                .find_by_triple(issue_id, user_id, role)
                .await?
                .map(|existing| (existing, false))
                .ok_or(AssignmentRegistryError::AssignmentNotFound {
                    issue_id,
                    user_id,
                    role,
                }),
            Err(err) => Err(err.into()),
        }
    }

    /// Removes one assignment record.
    pub(crate) async fn revoke(&self, assignment: &IssueAssignment) -> AssignmentRegistryResult<()> {
        self.assignments.delete(assignment.id()).await?;
        tracing::debug!(
            issue_id = %assignment.issue_id(),
            user_id = %assignment.user_id(),
            role = %assignment.role(),
            "assignment revoked"
        );
        Ok(())
    }

    /// Removes the assignment linking `user_id` to `issue_id` with `role`.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRegistryError::AssignmentNotFound`] when no such
    /// assignment exists.
    pub async fn unassign(
        &self,
        issue_id: IssueId,
        user_id: UserId,
        role: AssigneeRole,
    ) -> AssignmentRegistryResult<()> {
        let existing = self
            .assignments
            .find_by_triple(issue_id, user_id, role)
            .await?
            .ok_or(AssignmentRegistryError::AssignmentNotFound {
                issue_id,
                user_id,
                role,
            })?;
        match self.assignments.delete(existing.id()).await {
            Ok(()) => {}
            Err(AssignmentRepositoryError::NotFound(_)) => {
                return Err(AssignmentRegistryError::AssignmentNotFound {
                    issue_id,
                    user_id,
                    role,
                });
            }
            Err(err) => return Err(err.into()),
        }
        tracing::debug!(
            issue_id = %issue_id,
            user_id = %user_id,
            role = %role,
            "assignment removed"
        );
        Ok(())
    }

    /// Removes every assignment on an issue and returns how many went.
    ///
    /// Each record is deleted on its own. A failed delete is skipped and the
    /// remaining records are still attempted, so the count may be lower than
    /// the number of assignments that existed.
    ///
    /// # Errors
    ///
    /// Returns a storage error only when the assignments cannot be listed.
    pub async fn unassign_all(&self, issue_id: IssueId) -> AssignmentRegistryResult<usize> {
        let assignments = self.assignments.list_for_issue(issue_id).await?;
        let mut removed = 0_usize;
        for assignment in &assignments {
            if self.assignments.delete(assignment.id()).await.is_ok() {
                removed += 1;
            }
        }
        tracing::debug!(
            issue_id = %issue_id,
            removed,
            attempted = assignments.len(),
            "assignments cleared"
        );
        Ok(removed)
    }

    /// Returns assignments on an issue, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the lookup fails.
    pub async fn list_for_issue(
        &self,
        issue_id: IssueId,
    ) -> AssignmentRegistryResult<Vec<IssueAssignment>> {
        Ok(self.assignments.list_for_issue(issue_id).await?)
    }

    /// Returns assignments held by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the lookup fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> AssignmentRegistryResult<Vec<IssueAssignment>> {
        Ok(self.assignments.list_for_user(user_id).await?)
    }

    /// Returns assignments on an issue with `role`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the lookup fails.
    pub async fn list_for_issue_and_role(
        &self,
        issue_id: IssueId,
        role: AssigneeRole,
    ) -> AssignmentRegistryResult<Vec<IssueAssignment>> {
        Ok(self
            .assignments
            .list_for_issue_and_role(issue_id, role)
            .await?)
    }

    /// Returns the assignments on an issue grouped for role queries.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the lookup fails.
    pub async fn roster(&self, issue_id: IssueId) -> AssignmentRegistryResult<AssignmentRoster> {
        Ok(AssignmentRoster::new(self.list_for_issue(issue_id).await?))
    }

    /// Returns whether `user_id` holds any role on `issue_id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the lookup fails.
    pub async fn is_assigned(
        &self,
        issue_id: IssueId,
        user_id: UserId,
    ) -> AssignmentRegistryResult<bool> {
        Ok(self.roster(issue_id).await?.contains_user(user_id))
    }

    /// Returns whether `user_id` holds `role` on `issue_id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the lookup fails.
    pub async fn is_assigned_with_role(
        &self,
        issue_id: IssueId,
        user_id: UserId,
        role: AssigneeRole,
    ) -> AssignmentRegistryResult<bool> {
        Ok(self
            .assignments
            .find_by_triple(issue_id, user_id, role)
            .await?
            .is_some())
    }
}
