//! Issue workflow orchestration.
//!
//! Every status change runs under the issue's lock, re-reads the stored
//! issue, rejects the request if the caller's copy is stale, validates the
//! move against the transition table, and commits the issue row together
//! with its log entries.

mod actions;
mod error;
mod requests;

pub use error::{WorkflowError, WorkflowResult};
pub use requests::{IssueScope, TransitionIssueRequest};

use super::{AssignmentRegistry, IssueLockGuard, IssueLocks, WorkflowConfig};
use crate::issue::{
    domain::{
        Issue, IssueId, IssueReport, IssueStatus, Priority, Resolution, StatusLogEntry, ThreadLink,
    },
    ports::{AssignmentRepository, IssueRepository, PageRequest, UserDirectory},
};
use crate::tenancy::domain::{ChannelId, ProjectId, UserId};
use mockable::Clock;
use std::sync::Arc;

/// Status changes applied in one commit.
///
/// `via` lists intermediate statuses passed through before `target`.
struct TransitionPlan<'a> {
    via: &'a [IssueStatus],
    target: IssueStatus,
    note: Option<String>,
    resolution: Option<Resolution>,
}

impl TransitionPlan<'_> {
    const fn to(target: IssueStatus) -> Self {
        Self {
            via: &[],
            target,
            note: None,
            resolution: None,
        }
    }
}

/// Outcome of a committed plan.
struct AppliedPlan {
    issue: Issue,
    via_entries: Vec<StatusLogEntry>,
    entry: StatusLogEntry,
}

/// Orchestrates reports, status changes, and administrative edits.
#[derive(Clone)]
pub struct IssueWorkflowService<I, A, U, C>
where
    I: IssueRepository,
    A: AssignmentRepository,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    issues: Arc<I>,
    users: Arc<U>,
    registry: AssignmentRegistry<A, U, C>,
    clock: Arc<C>,
    locks: Arc<IssueLocks>,
    config: WorkflowConfig,
}

impl<I, A, U, C> IssueWorkflowService<I, A, U, C>
where
    I: IssueRepository,
    A: AssignmentRepository,
    U: UserDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a service with a private lock pool and default configuration.
    #[must_use]
    pub fn new(issues: Arc<I>, assignments: Arc<A>, users: Arc<U>, clock: Arc<C>) -> Self {
        let registry = AssignmentRegistry::new(assignments, Arc::clone(&users), Arc::clone(&clock));
        Self {
            issues,
            users,
            registry,
            clock,
            locks: Arc::new(IssueLocks::new()),
            config: WorkflowConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub const fn with_config(mut self, config: WorkflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Shares a lock pool with other service instances over the same store.
    #[must_use]
    pub fn with_locks(mut self, locks: Arc<IssueLocks>) -> Self {
        self.locks = locks;
        self
    }

    /// Returns the assignment registry used by composite actions.
    #[must_use]
    pub const fn registry(&self) -> &AssignmentRegistry<A, U, C> {
        &self.registry
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Files a new issue at [`IssueStatus::Open`].
    ///
    /// Reports without an explicit priority get the configured default. The
    /// opening log entry is stored with the issue.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::UserNotFound`] when the reporter is unknown,
    /// or a storage error.
    pub async fn report_issue(&self, report: IssueReport) -> WorkflowResult<Issue> {
        let reporter_id = report.reporter_id();
        if self.users.find_user(reporter_id).await?.is_none() {
            return Err(WorkflowError::UserNotFound(reporter_id));
        }

        let prepared = report.with_default_priority(self.config.default_priority);
        let (issue, opening) = Issue::report(prepared, &*self.clock);
        self.issues.store(&issue, &opening).await?;
        tracing::debug!(
            issue_id = %issue.id(),
            project_id = %issue.project_id(),
            source = %issue.source(),
            reporter = %reporter_id,
            "issue reported"
        );
        Ok(issue)
    }

    /// Returns an issue.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::IssueNotFound`] when the issue is unknown.
    pub async fn get_issue(&self, issue_id: IssueId) -> WorkflowResult<Issue> {
        self.issues
            .find_by_id(issue_id)
            .await?
            .ok_or(WorkflowError::IssueNotFound(issue_id))
    }

    /// Returns issues in `status`, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the lookup fails.
    pub async fn list_by_status(&self, status: IssueStatus) -> WorkflowResult<Vec<Issue>> {
        Ok(self.issues.find_by_status(status).await?)
    }

    /// Returns issues reported from a channel, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the lookup fails.
    pub async fn list_by_channel(&self, channel_id: ChannelId) -> WorkflowResult<Vec<Issue>> {
        Ok(self.issues.find_by_channel(channel_id).await?)
    }

    /// Returns issues filed under a project, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the lookup fails.
    pub async fn list_by_project(&self, project_id: ProjectId) -> WorkflowResult<Vec<Issue>> {
        Ok(self.issues.find_by_project(project_id).await?)
    }

    /// Returns one page of all issues, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the lookup fails.
    pub async fn list_issues(&self, offset: usize, limit: usize) -> WorkflowResult<Vec<Issue>> {
        Ok(self.issues.list(PageRequest::new(offset, limit)).await?)
    }

    /// Returns issues in `scope` whose id starts with `prefix`.
    ///
    /// Matching is case-sensitive against the lowercase hyphenated id. All
    /// matches are returned, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::PartialIdTooShort`] when `prefix` is shorter
    /// than the configured minimum, or a storage error.
    pub async fn search_by_partial_id(
        &self,
        scope: IssueScope,
        prefix: &str,
    ) -> WorkflowResult<Vec<Issue>> {
        let minimum = self.config.min_partial_id_length;
        if prefix.chars().count() < minimum {
            return Err(WorkflowError::PartialIdTooShort {
                supplied: prefix.to_owned(),
                minimum,
            });
        }

        let candidates = match scope {
            IssueScope::Channel(channel_id) => self.issues.find_by_channel(channel_id).await?,
            IssueScope::Project(project_id) => self.issues.find_by_project(project_id).await?,
        };
        Ok(candidates
            .into_iter()
            .filter(|issue| issue.id().matches_prefix(prefix))
            .collect())
    }

    /// Moves `issue` to `target`.
    ///
    /// `issue` is the caller's copy. The change is refused if the stored
    /// issue has changed since that copy was read.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidTransition`] when the table forbids the
    /// move, [`WorkflowError::ConcurrentModification`] when the caller's copy
    /// is stale, [`WorkflowError::IssueNotFound`], or a storage error. No
    /// state changes on error.
    pub async fn request_transition(
        &self,
        issue: &Issue,
        target: IssueStatus,
        actor: Option<UserId>,
    ) -> WorkflowResult<(Issue, StatusLogEntry)> {
        self.apply_single(issue, TransitionPlan::to(target), actor)
            .await
    }

    /// Moves the issue named in `request` to the named status.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidStatus`] for an unknown status name,
    /// otherwise as [`IssueWorkflowService::request_transition`].
    pub async fn transition(
        &self,
        request: TransitionIssueRequest,
    ) -> WorkflowResult<(Issue, StatusLogEntry)> {
        let target = IssueStatus::try_from(request.status.as_str())?;
        let current = self.get_issue(request.issue_id).await?;
        self.request_transition(&current, target, request.actor)
            .await
    }

    /// Changes the priority.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::ConcurrentModification`] when `issue` is
    /// stale, [`WorkflowError::IssueNotFound`], or a storage error.
    pub async fn update_priority(&self, issue: &Issue, priority: Priority) -> WorkflowResult<Issue> {
        let updated = self
            .apply_edit(issue, |current, clock| current.set_priority(priority, clock))
            .await?;
        tracing::debug!(issue_id = %updated.id(), priority = %priority, "issue priority updated");
        Ok(updated)
    }

    /// Changes the priority to the named value.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidPriority`] unless `priority` is
    /// `low`, `medium` or `high`; otherwise as
    /// [`IssueWorkflowService::update_priority`].
    pub async fn update_priority_named(
        &self,
        issue: &Issue,
        priority: &str,
    ) -> WorkflowResult<Issue> {
        let parsed = Priority::try_from(priority)?;
        self.update_priority(issue, parsed).await
    }

    /// Links the chat thread the issue is discussed in.
    ///
    /// # Errors
    ///
    /// As [`IssueWorkflowService::update_priority`].
    pub async fn update_thread_info(
        &self,
        issue: &Issue,
        thread_id: impl Into<String>,
        message_id: impl Into<String>,
    ) -> WorkflowResult<Issue> {
        let thread = ThreadLink {
            thread_id: thread_id.into(),
            message_id: message_id.into(),
        };
        let updated = self
            .apply_edit(issue, move |current, clock| current.link_thread(thread, clock))
            .await?;
        tracing::debug!(issue_id = %updated.id(), "issue thread linked");
        Ok(updated)
    }

    async fn apply_single(
        &self,
        snapshot: &Issue,
        plan: TransitionPlan<'_>,
        actor: Option<UserId>,
    ) -> WorkflowResult<(Issue, StatusLogEntry)> {
        let applied = self.apply_plan(snapshot, plan, actor).await?;
        Ok((applied.issue, applied.entry))
    }

    async fn apply_plan(
        &self,
        snapshot: &Issue,
        plan: TransitionPlan<'_>,
        actor: Option<UserId>,
    ) -> WorkflowResult<AppliedPlan> {
        let guard = self.locks.acquire(snapshot.id()).await;
        let current = self.load_fresh(snapshot).await?;
        self.commit_plan(&guard, current, plan, actor).await
    }

    /// Applies `plan` to `current` and commits it.
    ///
    /// `current` must have been loaded while `guard` was held.
    async fn commit_plan(
        &self,
        _guard: &IssueLockGuard,
        mut current: Issue,
        plan: TransitionPlan<'_>,
        actor: Option<UserId>,
    ) -> WorkflowResult<AppliedPlan> {
        let expected_version = current.version();

        if let Some(resolution) = plan.resolution {
            current.record_resolution(resolution.cause, resolution.action);
        }
        let mut via_entries = Vec::with_capacity(plan.via.len());
        for step in plan.via {
            via_entries.push(current.transition_to(*step, actor, &*self.clock)?);
        }
        let mut entry = current.transition_to(plan.target, actor, &*self.clock)?;
        if let Some(note) = plan.note {
            entry = entry.with_note(note);
        }

        let mut committed = via_entries.clone();
        committed.push(entry.clone());
        self.issues
            .commit_transition(&current, expected_version, &committed)
            .await?;
        for applied in &committed {
            tracing::debug!(
                issue_id = %current.id(),
                from = ?applied.old_status(),
                to = %applied.new_status(),
                actor = ?actor,
                "issue status changed"
            );
        }
        Ok(AppliedPlan {
            issue: current,
            via_entries,
            entry,
        })
    }

    async fn apply_edit<F>(&self, snapshot: &Issue, edit: F) -> WorkflowResult<Issue>
    where
        F: FnOnce(&mut Issue, &C),
    {
        let _guard = self.locks.acquire(snapshot.id()).await;
        let mut current = self.load_fresh(snapshot).await?;
        let expected_version = current.version();
        edit(&mut current, &*self.clock);
        self.issues.update(&current, expected_version).await?;
        Ok(current)
    }

    /// Loads the stored issue and checks it still matches `snapshot`.
    async fn load_fresh(&self, snapshot: &Issue) -> WorkflowResult<Issue> {
        let current = self.get_issue(snapshot.id()).await?;
        if current.version() != snapshot.version() {
            return Err(WorkflowError::ConcurrentModification {
                issue_id: snapshot.id(),
                expected_version: snapshot.version(),
                actual_version: current.version(),
            });
        }
        Ok(current)
    }
}
