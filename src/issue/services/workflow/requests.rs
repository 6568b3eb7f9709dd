//! Request payloads accepted by the workflow service.

use crate::issue::domain::IssueId;
use crate::tenancy::domain::{ChannelId, ProjectId, UserId};

/// Request to move an issue to a status given by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionIssueRequest {
    pub(super) issue_id: IssueId,
    pub(super) status: String,
    pub(super) actor: Option<UserId>,
}

impl TransitionIssueRequest {
    /// Creates a system-triggered request.
    #[must_use]
    pub fn new(issue_id: IssueId, status: impl Into<String>) -> Self {
        Self {
            issue_id,
            status: status.into(),
            actor: None,
        }
    }

    /// Records the user who asked for the change.
    #[must_use]
    pub const fn with_actor(mut self, actor: UserId) -> Self {
        self.actor = Some(actor);
        self
    }
}

/// Set of issues searched by partial id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueScope {
    /// Issues reported from one registered channel.
    Channel(ChannelId),
    /// Issues filed under one project.
    Project(ProjectId),
}
