//! In-memory assignment storage.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

use crate::issue::{
    domain::{AssigneeRole, AssignmentId, IssueAssignment, IssueId},
    ports::{AssignmentRepository, AssignmentRepositoryError, AssignmentRepositoryResult},
};
use crate::tenancy::domain::UserId;

/// Thread-safe in-memory assignment repository.
///
/// Records are kept in creation order, so ascending listings need no sort
/// beyond the timestamp tie-break.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssignmentRepository {
    assignments: Arc<RwLock<Vec<IssueAssignment>>>,
}

impl InMemoryAssignmentRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn select_oldest_first<P>(&self, predicate: P) -> AssignmentRepositoryResult<Vec<IssueAssignment>>
    where
        P: Fn(&IssueAssignment) -> bool,
    {
        let assignments = self.assignments.read().map_err(lock_error)?;
        let mut selected: Vec<IssueAssignment> = assignments
            .iter()
            .filter(|assignment| predicate(assignment))
            .cloned()
            .collect();
        selected.sort_by_key(IssueAssignment::assigned_at);
        Ok(selected)
    }
}

fn lock_error<T>(err: PoisonError<T>) -> AssignmentRepositoryError {
    AssignmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignmentRepository {
    async fn create(&self, assignment: &IssueAssignment) -> AssignmentRepositoryResult<()> {
        let mut assignments = self.assignments.write().map_err(lock_error)?;
        let duplicate = assignments.iter().any(|existing| {
            existing.matches(assignment.issue_id(), assignment.user_id(), assignment.role())
        });
        if duplicate {
            return Err(AssignmentRepositoryError::DuplicateAssignment {
                issue_id: assignment.issue_id(),
                user_id: assignment.user_id(),
                role: assignment.role(),
            });
        }
        assignments.push(assignment.clone());
        Ok(())
    }

    async fn delete(&self, id: AssignmentId) -> AssignmentRepositoryResult<()> {
        let mut assignments = self.assignments.write().map_err(lock_error)?;
        let position = assignments
            .iter()
            .position(|assignment| assignment.id() == id)
            .ok_or(AssignmentRepositoryError::NotFound(id))?;
        assignments.remove(position);
        Ok(())
    }

    async fn delete_all_for_issue(&self, issue_id: IssueId) -> AssignmentRepositoryResult<usize> {
        let mut assignments = self.assignments.write().map_err(lock_error)?;
        let before = assignments.len();
        assignments.retain(|assignment| assignment.issue_id() != issue_id);
        Ok(before - assignments.len())
    }

    async fn find_by_triple(
        &self,
        issue_id: IssueId,
        user_id: UserId,
        role: AssigneeRole,
    ) -> AssignmentRepositoryResult<Option<IssueAssignment>> {
        let assignments = self.assignments.read().map_err(lock_error)?;
        Ok(assignments
            .iter()
            .find(|assignment| assignment.matches(issue_id, user_id, role))
            .cloned())
    }

    async fn list_for_issue(
        &self,
        issue_id: IssueId,
    ) -> AssignmentRepositoryResult<Vec<IssueAssignment>> {
        self.select_oldest_first(|assignment| assignment.issue_id() == issue_id)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> AssignmentRepositoryResult<Vec<IssueAssignment>> {
        let mut selected = self.select_oldest_first(|assignment| assignment.user_id() == user_id)?;
        selected.reverse();
        Ok(selected)
    }

    async fn list_for_issue_and_role(
        &self,
        issue_id: IssueId,
        role: AssigneeRole,
    ) -> AssignmentRepositoryResult<Vec<IssueAssignment>> {
        self.select_oldest_first(|assignment| {
            assignment.issue_id() == issue_id && assignment.role() == role
        })
    }
}
