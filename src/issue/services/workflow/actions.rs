//! Named workflow actions built on [`IssueWorkflowService::request_transition`].

use super::{IssueWorkflowService, TransitionPlan, WorkflowError, WorkflowResult};
use crate::issue::{
    domain::{AssigneeRole, Issue, IssueStatus, Resolution, StatusLogEntry},
    ports::{AssignmentRepository, IssueRepository, UserDirectory},
};
use crate::tenancy::domain::UserId;
use mockable::Clock;
use std::sync::Arc;

impl<I, A, U, C> IssueWorkflowService<I, A, U, C>
where
    I: IssueRepository,
    A: AssignmentRepository,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    /// Closes the issue.
    ///
    /// # Errors
    ///
    /// As [`IssueWorkflowService::request_transition`].
    pub async fn close(
        &self,
        issue: &Issue,
        actor: Option<UserId>,
    ) -> WorkflowResult<(Issue, StatusLogEntry)> {
        self.apply_single(issue, TransitionPlan::to(IssueStatus::Closed), actor)
            .await
    }

    /// Returns the issue to [`IssueStatus::Open`].
    ///
    /// A closed issue passes through [`IssueStatus::Reopened`] first, so two
    /// entries are logged in one commit. From any other status the issue
    /// moves to `open` directly if the table allows it.
    ///
    /// # Errors
    ///
    /// As [`IssueWorkflowService::request_transition`].
    pub async fn reopen(
        &self,
        issue: &Issue,
        actor: Option<UserId>,
    ) -> WorkflowResult<(Issue, Vec<StatusLogEntry>)> {
        let plan = if issue.status() == IssueStatus::Closed {
            TransitionPlan {
                via: &[IssueStatus::Reopened],
                ..TransitionPlan::to(IssueStatus::Open)
            }
        } else {
            TransitionPlan::to(IssueStatus::Open)
        };
        let applied = self.apply_plan(issue, plan, actor).await?;
        let mut entries = applied.via_entries;
        entries.push(applied.entry);
        Ok((applied.issue, entries))
    }

    /// Assigns a developer and moves the issue to
    /// [`IssueStatus::AssignedDev`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidTransition`] without touching the
    /// assignments when the stored issue cannot make the move,
    /// [`WorkflowError::UserNotFound`] when the developer is unknown, or any
    /// error from [`IssueWorkflowService::request_transition`]. A newly
    /// created assignment is removed again when the status change fails;
    /// if that removal fails too, the status change error is wrapped in
    /// [`WorkflowError::RollbackFailed`].
    pub async fn assign_developer(
        &self,
        issue: &Issue,
        developer: UserId,
        actor: Option<UserId>,
    ) -> WorkflowResult<(Issue, StatusLogEntry)> {
        self.assign_and_transition(
            issue,
            developer,
            AssigneeRole::Dev,
            IssueStatus::AssignedDev,
            actor,
        )
        .await
    }

    /// Marks work as started.
    ///
    /// # Errors
    ///
    /// As [`IssueWorkflowService::request_transition`].
    pub async fn start_work(
        &self,
        issue: &Issue,
        actor: Option<UserId>,
    ) -> WorkflowResult<(Issue, StatusLogEntry)> {
        self.apply_single(issue, TransitionPlan::to(IssueStatus::InProgress), actor)
            .await
    }

    /// Records the cause and remedy and moves the issue to
    /// [`IssueStatus::Resolved`].
    ///
    /// The resolution notes are committed with the status change and are
    /// discarded if the change is refused.
    ///
    /// # Errors
    ///
    /// As [`IssueWorkflowService::request_transition`].
    pub async fn resolve(
        &self,
        issue: &Issue,
        cause: impl Into<String>,
        action: impl Into<String>,
        actor: Option<UserId>,
    ) -> WorkflowResult<(Issue, StatusLogEntry)> {
        let plan = TransitionPlan {
            resolution: Some(Resolution {
                cause: Some(cause.into()),
                action: Some(action.into()),
            }),
            ..TransitionPlan::to(IssueStatus::Resolved)
        };
        self.apply_single(issue, plan, actor).await
    }

    /// Assigns a QA tester and moves the issue to
    /// [`IssueStatus::AssignedQa`].
    ///
    /// # Errors
    ///
    /// As [`IssueWorkflowService::assign_developer`].
    pub async fn assign_qa(
        &self,
        issue: &Issue,
        tester: UserId,
        actor: Option<UserId>,
    ) -> WorkflowResult<(Issue, StatusLogEntry)> {
        self.assign_and_transition(
            issue,
            tester,
            AssigneeRole::Qa,
            IssueStatus::AssignedQa,
            actor,
        )
        .await
    }

    /// Marks the fix as verified, keeping `notes` on the log entry.
    ///
    /// # Errors
    ///
    /// As [`IssueWorkflowService::request_transition`].
    pub async fn verify(
        &self,
        issue: &Issue,
        notes: impl Into<String>,
        actor: Option<UserId>,
    ) -> WorkflowResult<(Issue, StatusLogEntry)> {
        let plan = TransitionPlan {
            note: Some(notes.into()),
            ..TransitionPlan::to(IssueStatus::Verified)
        };
        self.apply_single(issue, plan, actor).await
    }

    /// Rejects the fix, keeping `reason` on the log entry.
    ///
    /// # Errors
    ///
    /// As [`IssueWorkflowService::request_transition`].
    pub async fn reject(
        &self,
        issue: &Issue,
        reason: impl Into<String>,
        actor: Option<UserId>,
    ) -> WorkflowResult<(Issue, StatusLogEntry)> {
        let plan = TransitionPlan {
            note: Some(reason.into()),
            ..TransitionPlan::to(IssueStatus::Rejected)
        };
        self.apply_single(issue, plan, actor).await
    }

    async fn assign_and_transition(
        &self,
        issue: &Issue,
        user_id: UserId,
        role: AssigneeRole,
        target: IssueStatus,
        actor: Option<UserId>,
    ) -> WorkflowResult<(Issue, StatusLogEntry)> {
        // The assignment and the status change share one hold on the issue.
        let guard = self.locks.acquire(issue.id()).await;
        let current = self.load_fresh(issue).await?;
        if !current.can_transition_to(target) {
            return Err(WorkflowError::InvalidTransition {
                issue_id: current.id(),
                from: current.status(),
                to: target,
            });
        }

        let (assignment, created) = self
            .registry
            .assign_tracked(current.id(), user_id, role)
            .await?;
        let failure = match self
            .commit_plan(&guard, current, TransitionPlan::to(target), actor)
            .await
        {
            Ok(applied) => return Ok((applied.issue, applied.entry)),
            Err(err) => err,
        };
        if !created || !self.config.compensate_failed_assignments {
            return Err(failure);
        }
        match self.registry.revoke(&assignment).await {
            Ok(()) => Err(failure),
            Err(rollback) => Err(WorkflowError::RollbackFailed {
                error: Arc::new(failure),
                rollback: Arc::new(rollback),
            }),
        }
    }
}
