//! In-memory issue and status log storage.
//!
//! Issues and their log entries share one lock so a status change and its
//! log entries land together, matching the transactional adapter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::issue::{
    domain::{Issue, IssueId, IssueStatus, IssueVersion, StatusLogEntry},
    ports::{
        IssueRepository, IssueRepositoryError, IssueRepositoryResult, PageRequest,
        StatusLogRepository, StatusLogRepositoryError, StatusLogRepositoryResult,
    },
};
use crate::tenancy::domain::{ChannelId, ProjectId};

/// Thread-safe in-memory store implementing both [`IssueRepository`] and
/// [`StatusLogRepository`].
///
/// Clones share the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueStore {
    state: Arc<RwLock<IssueStoreState>>,
}

#[derive(Debug, Default)]
struct IssueStoreState {
    issues: HashMap<IssueId, Issue>,
    // Report order, used to break created_at ties.
    report_order: Vec<IssueId>,
    // Append order across all issues.
    log: Vec<StatusLogEntry>,
}

impl InMemoryIssueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of log entries across all issues.
    ///
    /// # Errors
    ///
    /// Returns [`StatusLogRepositoryError::Persistence`] if the lock is
    /// poisoned.
    pub fn log_len(&self) -> StatusLogRepositoryResult<usize> {
        let state = self.state.read().map_err(log_lock_error)?;
        Ok(state.log.len())
    }

    fn collect_newest_first<P>(&self, predicate: P) -> IssueRepositoryResult<Vec<Issue>>
    where
        P: Fn(&Issue) -> bool,
    {
        let state = self.state.read().map_err(issue_lock_error)?;
        let mut issues: Vec<Issue> = state
            .report_order
            .iter()
            .rev()
            .filter_map(|id| state.issues.get(id))
            .filter(|issue| predicate(issue))
            .cloned()
            .collect();
        issues.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(issues)
    }
}

fn issue_lock_error<T>(err: PoisonError<T>) -> IssueRepositoryError {
    IssueRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn log_lock_error<T>(err: PoisonError<T>) -> StatusLogRepositoryError {
    StatusLogRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn check_version(
    state: &IssueStoreState,
    issue: &Issue,
    expected_version: IssueVersion,
) -> IssueRepositoryResult<()> {
    let stored = state
        .issues
        .get(&issue.id())
        .ok_or(IssueRepositoryError::NotFound(issue.id()))?;
    if stored.version() != expected_version {
        return Err(IssueRepositoryError::ConcurrentModification {
            issue_id: issue.id(),
            expected_version,
            actual_version: stored.version(),
        });
    }
    Ok(())
}

#[async_trait]
impl IssueRepository for InMemoryIssueStore {
    async fn store(&self, issue: &Issue, opening: &StatusLogEntry) -> IssueRepositoryResult<()> {
        let mut state = self.state.write().map_err(issue_lock_error)?;
        if state.issues.contains_key(&issue.id()) {
            return Err(IssueRepositoryError::DuplicateIssue(issue.id()));
        }
        state.issues.insert(issue.id(), issue.clone());
        state.report_order.push(issue.id());
        state.log.push(opening.clone());
        Ok(())
    }

    async fn update(
        &self,
        issue: &Issue,
        expected_version: IssueVersion,
    ) -> IssueRepositoryResult<()> {
        let mut state = self.state.write().map_err(issue_lock_error)?;
        check_version(&state, issue, expected_version)?;
        state.issues.insert(issue.id(), issue.clone());
        Ok(())
    }

    async fn commit_transition(
        &self,
        issue: &Issue,
        expected_version: IssueVersion,
        entries: &[StatusLogEntry],
    ) -> IssueRepositoryResult<()> {
        let mut state = self.state.write().map_err(issue_lock_error)?;
        check_version(&state, issue, expected_version)?;
        state.issues.insert(issue.id(), issue.clone());
        state.log.extend(entries.iter().cloned());
        Ok(())
    }

    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>> {
        let state = self.state.read().map_err(issue_lock_error)?;
        Ok(state.issues.get(&id).cloned())
    }

    async fn find_by_status(&self, status: IssueStatus) -> IssueRepositoryResult<Vec<Issue>> {
        self.collect_newest_first(|issue| issue.status() == status)
    }

    async fn find_by_channel(&self, channel_id: ChannelId) -> IssueRepositoryResult<Vec<Issue>> {
        self.collect_newest_first(|issue| issue.channel_id() == Some(channel_id))
    }

    async fn find_by_project(&self, project_id: ProjectId) -> IssueRepositoryResult<Vec<Issue>> {
        self.collect_newest_first(|issue| issue.project_id() == project_id)
    }

    async fn list(&self, page: PageRequest) -> IssueRepositoryResult<Vec<Issue>> {
        let issues = self.collect_newest_first(|_| true)?;
        Ok(issues
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect())
    }
}

#[async_trait]
impl StatusLogRepository for InMemoryIssueStore {
    async fn append(&self, entry: &StatusLogEntry) -> StatusLogRepositoryResult<()> {
        let mut state = self.state.write().map_err(log_lock_error)?;
        if state.log.iter().any(|existing| existing.id() == entry.id()) {
            return Err(StatusLogRepositoryError::DuplicateEntry(entry.id()));
        }
        state.log.push(entry.clone());
        Ok(())
    }

    async fn history_for(
        &self,
        issue_id: IssueId,
    ) -> StatusLogRepositoryResult<Vec<StatusLogEntry>> {
        let state = self.state.read().map_err(log_lock_error)?;
        Ok(state
            .log
            .iter()
            .rev()
            .filter(|entry| entry.issue_id() == issue_id)
            .cloned()
            .collect())
    }

    async fn recent(&self, limit: usize) -> StatusLogRepositoryResult<Vec<StatusLogEntry>> {
        let state = self.state.read().map_err(log_lock_error)?;
        Ok(state.log.iter().rev().take(limit).cloned().collect())
    }
}
