//! Role-tagged links between users and issues.

use super::{AssigneeRole, AssignmentId, IssueId};
use crate::tenancy::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A user holding a role on an issue.
///
/// The `(issue, user, role)` triple is unique across all assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueAssignment {
    id: AssignmentId,
    issue_id: IssueId,
    user_id: UserId,
    role: AssigneeRole,
    assigned_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAssignmentData {
    /// Persisted assignment identifier.
    pub id: AssignmentId,
    /// Assigned issue.
    pub issue_id: IssueId,
    /// Assigned user.
    pub user_id: UserId,
    /// Role held.
    pub role: AssigneeRole,
    /// Time of assignment.
    pub assigned_at: DateTime<Utc>,
}

impl IssueAssignment {
    /// Creates a new assignment at the current clock time.
    #[must_use]
    pub fn new(
        issue_id: IssueId,
        user_id: UserId,
        role: AssigneeRole,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: AssignmentId::new(),
            issue_id,
            user_id,
            role,
            assigned_at: clock.utc(),
        }
    }

    /// Reconstructs an assignment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAssignmentData) -> Self {
        Self {
            id: data.id,
            issue_id: data.issue_id,
            user_id: data.user_id,
            role: data.role,
            assigned_at: data.assigned_at,
        }
    }

    /// Returns the assignment identifier.
    #[must_use]
    pub const fn id(&self) -> AssignmentId {
        self.id
    }

    /// Returns the assigned issue.
    #[must_use]
    pub const fn issue_id(&self) -> IssueId {
        self.issue_id
    }

    /// Returns the assigned user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the role held.
    #[must_use]
    pub const fn role(&self) -> AssigneeRole {
        self.role
    }

    /// Returns the assignment time.
    #[must_use]
    pub const fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }

    /// Returns whether this assignment is for the given triple.
    #[must_use]
    pub fn matches(&self, issue_id: IssueId, user_id: UserId, role: AssigneeRole) -> bool {
        self.issue_id == issue_id && self.user_id == user_id && self.role == role
    }
}

/// The assignments currently held on one issue.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssignmentRoster {
    assignments: Vec<IssueAssignment>,
}

impl AssignmentRoster {
    /// Wraps a list of assignments.
    #[must_use]
    pub const fn new(assignments: Vec<IssueAssignment>) -> Self {
        Self { assignments }
    }

    /// Returns the assignments holding `role`.
    pub fn by_role(&self, role: AssigneeRole) -> impl Iterator<Item = &IssueAssignment> {
        self.assignments
            .iter()
            .filter(move |assignment| assignment.role() == role)
    }

    /// Returns the developer assignments.
    pub fn developers(&self) -> impl Iterator<Item = &IssueAssignment> {
        self.by_role(AssigneeRole::Dev)
    }

    /// Returns the QA assignments.
    pub fn qa_testers(&self) -> impl Iterator<Item = &IssueAssignment> {
        self.by_role(AssigneeRole::Qa)
    }

    /// Returns the reviewer assignments.
    pub fn reviewers(&self) -> impl Iterator<Item = &IssueAssignment> {
        self.by_role(AssigneeRole::Reviewer)
    }

    /// Returns how many assignments hold `role`.
    #[must_use]
    pub fn count_by_role(&self, role: AssigneeRole) -> usize {
        self.by_role(role).count()
    }

    /// Returns whether `user_id` holds any role.
    #[must_use]
    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.assignments
            .iter()
            .any(|assignment| assignment.user_id() == user_id)
    }

    /// Returns whether `user_id` holds `role`.
    #[must_use]
    pub fn contains_user_with_role(&self, user_id: UserId, role: AssigneeRole) -> bool {
        self.by_role(role)
            .any(|assignment| assignment.user_id() == user_id)
    }

    /// Returns the number of assignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns whether nobody is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Returns the assignments as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[IssueAssignment] {
        &self.assignments
    }

    /// Consumes the roster and returns the assignments.
    #[must_use]
    pub fn into_inner(self) -> Vec<IssueAssignment> {
        self.assignments
    }
}
