//! Status log queries and appends.

use super::WorkflowConfig;
use crate::issue::{
    domain::{IssueId, IssueStatus, StatusHistoryError, StatusLogEntry, replay_history},
    ports::{StatusLogRepository, StatusLogRepositoryError},
};
use crate::tenancy::domain::UserId;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`StatusLogService`].
#[derive(Debug, Clone, Error)]
pub enum StatusLogError {
    /// The log store failed.
    #[error(transparent)]
    Repository(#[from] StatusLogRepositoryError),
    /// A stored history does not chain from one status to the next.
    #[error(transparent)]
    History(#[from] StatusHistoryError),
}

/// Result type for status log service operations.
pub type StatusLogResult<T> = Result<T, StatusLogError>;

/// Read and append access to the status log.
///
/// Appends here are not validated against the transition table. Workflow
/// status changes go through
/// [`IssueWorkflowService`](super::IssueWorkflowService), which validates and
/// writes the log as part of the same commit.
#[derive(Clone)]
pub struct StatusLogService<L, C>
where
    L: StatusLogRepository,
    C: Clock + Send + Sync,
{
    log: Arc<L>,
    clock: Arc<C>,
    config: WorkflowConfig,
}

impl<L, C> StatusLogService<L, C>
where
    L: StatusLogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(log: Arc<L>, clock: Arc<C>) -> Self {
        Self {
            log,
            clock,
            config: WorkflowConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub const fn with_config(mut self, config: WorkflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Appends one entry stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`StatusLogError::Repository`] when the store rejects the
    /// write.
    pub async fn append(
        &self,
        issue_id: IssueId,
        old_status: Option<IssueStatus>,
        new_status: IssueStatus,
        actor: Option<UserId>,
    ) -> StatusLogResult<StatusLogEntry> {
        let entry = StatusLogEntry::record(issue_id, old_status, new_status, actor, &*self.clock);
        self.log.append(&entry).await?;
        tracing::debug!(
            issue_id = %issue_id,
            new_status = %new_status,
            "status log entry appended"
        );
        Ok(entry)
    }

    /// Returns the history of one issue, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StatusLogError::Repository`] when the lookup fails.
    pub async fn history_for(&self, issue_id: IssueId) -> StatusLogResult<Vec<StatusLogEntry>> {
        Ok(self.log.history_for(issue_id).await?)
    }

    /// Returns the history of one issue, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StatusLogError::Repository`] when the lookup fails.
    pub async fn timeline(&self, issue_id: IssueId) -> StatusLogResult<Vec<StatusLogEntry>> {
        let mut entries = self.history_for(issue_id).await?;
        entries.reverse();
        Ok(entries)
    }

    /// Replays the history of one issue and returns the statuses it passed
    /// through, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StatusLogError::History`] when an entry's previous status
    /// does not match the entry before it.
    pub async fn replay(&self, issue_id: IssueId) -> StatusLogResult<Vec<IssueStatus>> {
        let timeline = self.timeline(issue_id).await?;
        Ok(replay_history(&timeline)?)
    }

    /// Returns the latest entries across all issues, newest first.
    ///
    /// `limit` is clamped to the configured recent-activity cap.
    ///
    /// # Errors
    ///
    /// Returns [`StatusLogError::Repository`] when the lookup fails.
    pub async fn recent(&self, limit: usize) -> StatusLogResult<Vec<StatusLogEntry>> {
        let capped = limit.min(self.config.recent_log_limit_cap);
        Ok(self.log.recent(capped).await?)
    }
}
