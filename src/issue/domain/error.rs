//! Error types for issue workflow validation and parsing.

use super::{IssueId, IssueStatus};
use crate::tenancy::domain::ChannelId;
use thiserror::Error;

/// Errors returned by issue domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IssueDomainError {
    /// The requested status change is not permitted by the workflow table.
    #[error("issue {issue_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Issue whose transition was rejected.
        issue_id: IssueId,
        /// Status the issue currently holds.
        from: IssueStatus,
        /// Status that was requested.
        to: IssueStatus,
    },

    /// The status value is not part of the workflow vocabulary.
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// The priority value is not one of `low`, `medium`, `high`.
    #[error("invalid priority: {0}")]
    InvalidPriority(String),

    /// The assignee role is not one of `dev`, `qa`, `reviewer`, `other`.
    #[error("invalid assignee role: {0}")]
    InvalidRole(String),

    /// The issue source is not one of `web`, `chat`.
    #[error("invalid issue source: {0}")]
    InvalidSource(String),

    /// The issue title is empty after trimming.
    #[error("issue title must not be empty")]
    EmptyTitle,

    /// The issue description is empty after trimming.
    #[error("issue description must not be empty")]
    EmptyDescription,

    /// Issues cannot be reported from a deactivated channel.
    #[error("channel {0} is not active")]
    InactiveChannel(ChannelId),
}

/// Error returned when a status history does not replay cleanly.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("status history breaks at entry {position}: expected previous status {expected:?}, found {found:?}")]
pub struct StatusHistoryError {
    /// Zero-based index of the offending entry in oldest-first order.
    pub position: usize,
    /// Previous status implied by the entries before it.
    pub expected: Option<IssueStatus>,
    /// Previous status recorded on the entry.
    pub found: Option<IssueStatus>,
}
