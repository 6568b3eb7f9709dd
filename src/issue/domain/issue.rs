//! Issue aggregate root and report payload.

use super::{
    IssueDomainError, IssueId, IssueSource, IssueStatus, IssueVersion, Priority, StatusLogEntry,
};
use crate::tenancy::domain::{Channel, ChannelId, ProjectId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Validated payload for reporting a new issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReport {
    project_id: ProjectId,
    channel_id: Option<ChannelId>,
    reporter_id: UserId,
    title: String,
    description: String,
    image_url: Option<String>,
    priority: Option<Priority>,
    source: IssueSource,
}

impl IssueReport {
    /// Creates a web-sourced report filed directly under a project.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyTitle`] or
    /// [`IssueDomainError::EmptyDescription`] when either text is blank.
    pub fn new(
        project_id: ProjectId,
        reporter_id: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, IssueDomainError> {
        let raw_title = title.into();
        let raw_description = description.into();
        let normalized_title = raw_title.trim();
        let normalized_description = raw_description.trim();
        if normalized_title.is_empty() {
            return Err(IssueDomainError::EmptyTitle);
        }
        if normalized_description.is_empty() {
            return Err(IssueDomainError::EmptyDescription);
        }

        Ok(Self {
            project_id,
            channel_id: None,
            reporter_id,
            title: normalized_title.to_owned(),
            description: normalized_description.to_owned(),
            image_url: None,
            priority: None,
            source: IssueSource::Web,
        })
    }

    /// Creates a chat-sourced report filed under the channel's project.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::InactiveChannel`] when the channel has been
    /// deactivated, or [`IssueDomainError::EmptyTitle`] /
    /// [`IssueDomainError::EmptyDescription`] when either text is blank.
    pub fn from_channel(
        channel: &Channel,
        reporter_id: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, IssueDomainError> {
        if !channel.is_active() {
            return Err(IssueDomainError::InactiveChannel(channel.id()));
        }
        let mut report = Self::new(channel.project_id(), reporter_id, title, description)?;
        report.channel_id = Some(channel.id());
        report.source = IssueSource::Chat;
        Ok(report)
    }

    /// Attaches an image reference.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        let value = image_url.into();
        let normalized = value.trim();
        self.image_url = (!normalized.is_empty()).then_some(normalized.to_owned());
        self
    }

    /// Overrides the initial priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Fills in `priority` unless one was chosen explicitly.
    #[must_use]
    pub(crate) const fn with_default_priority(mut self, priority: Priority) -> Self {
        if self.priority.is_none() {
            self.priority = Some(priority);
        }
        self
    }

    /// Returns the project the issue will be filed under.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the reporting user.
    #[must_use]
    pub const fn reporter_id(&self) -> UserId {
        self.reporter_id
    }

    /// Returns the intake source.
    #[must_use]
    pub const fn source(&self) -> IssueSource {
        self.source
    }

    /// Returns the registered channel the report came from, if any.
    #[must_use]
    pub const fn channel_id(&self) -> Option<ChannelId> {
        self.channel_id
    }
}

/// Chat thread the issue is discussed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadLink {
    /// Platform thread identifier.
    pub thread_id: String,
    /// Platform identifier of the message that opened the thread.
    pub message_id: String,
}

/// Cause and remedy recorded when an issue is resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// What caused the issue.
    pub cause: Option<String>,
    /// What was done about it.
    pub action: Option<String>,
}

/// Issue aggregate root.
///
/// `closed_at` is set exactly when the status is [`IssueStatus::Closed`], and
/// the owning project never changes after the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    id: IssueId,
    project_id: ProjectId,
    channel_id: Option<ChannelId>,
    reporter_id: UserId,
    legacy_assignee_id: Option<UserId>,
    title: String,
    description: String,
    image_url: Option<String>,
    priority: Priority,
    status: IssueStatus,
    source: IssueSource,
    thread: Option<ThreadLink>,
    public_hash: Option<String>,
    resolution: Resolution,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
    version: IssueVersion,
}

/// Parameter object for reconstructing a persisted issue aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedIssueData {
    /// Persisted issue identifier.
    pub id: IssueId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Registered channel the issue came from, if any.
    pub channel_id: Option<ChannelId>,
    /// Reporting user.
    pub reporter_id: UserId,
    /// Deprecated single assignee kept for older rows.
    pub legacy_assignee_id: Option<UserId>,
    /// Issue title.
    pub title: String,
    /// Issue description.
    pub description: String,
    /// Image reference, if any.
    pub image_url: Option<String>,
    /// Current priority.
    pub priority: Priority,
    /// Current workflow status.
    pub status: IssueStatus,
    /// Intake source.
    pub source: IssueSource,
    /// Linked discussion thread, if any.
    pub thread: Option<ThreadLink>,
    /// Public link hash, if any.
    pub public_hash: Option<String>,
    /// Resolution notes.
    pub resolution: Resolution,
    /// Report timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Close timestamp, present only while closed.
    pub closed_at: Option<DateTime<Utc>>,
    /// Row version for optimistic concurrency.
    pub version: IssueVersion,
}

impl Issue {
    /// Creates an issue from a report.
    ///
    /// The issue starts at [`IssueStatus::Open`]; the returned log entry
    /// records that opening with no previous status.
    #[must_use]
    pub fn report(report: IssueReport, clock: &impl Clock) -> (Self, StatusLogEntry) {
        let timestamp = clock.utc();
        let id = IssueId::new();
        let issue = Self {
            id,
            project_id: report.project_id,
            channel_id: report.channel_id,
            reporter_id: report.reporter_id,
            legacy_assignee_id: None,
            title: report.title,
            description: report.description,
            image_url: report.image_url,
            priority: report.priority.unwrap_or_default(),
            status: IssueStatus::Open,
            source: report.source,
            thread: None,
            public_hash: Some(public_hash_for(id, timestamp)),
            resolution: Resolution::default(),
            created_at: timestamp,
            updated_at: timestamp,
            closed_at: None,
            version: IssueVersion::INITIAL,
        };
        let opening = StatusLogEntry::recorded_at(
            id,
            None,
            IssueStatus::Open,
            Some(report.reporter_id),
            timestamp,
        );
        (issue, opening)
    }

    /// Reconstructs an issue from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIssueData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            channel_id: data.channel_id,
            reporter_id: data.reporter_id,
            legacy_assignee_id: data.legacy_assignee_id,
            title: data.title,
            description: data.description,
            image_url: data.image_url,
            priority: data.priority,
            status: data.status,
            source: data.source,
            thread: data.thread,
            public_hash: data.public_hash,
            resolution: data.resolution,
            created_at: data.created_at,
            updated_at: data.updated_at,
            closed_at: data.closed_at,
            version: data.version,
        }
    }

    /// Returns the issue identifier.
    #[must_use]
    pub const fn id(&self) -> IssueId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the registered channel the issue came from, if any.
    #[must_use]
    pub const fn channel_id(&self) -> Option<ChannelId> {
        self.channel_id
    }

    /// Returns the reporting user.
    #[must_use]
    pub const fn reporter_id(&self) -> UserId {
        self.reporter_id
    }

    /// Returns the deprecated single assignee, if a legacy row carried one.
    #[must_use]
    pub const fn legacy_assignee_id(&self) -> Option<UserId> {
        self.legacy_assignee_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the image reference, if any.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> IssueStatus {
        self.status
    }

    /// Returns the intake source.
    #[must_use]
    pub const fn source(&self) -> IssueSource {
        self.source
    }

    /// Returns whether the issue was reported from a registered chat channel.
    #[must_use]
    pub const fn is_chat_issue(&self) -> bool {
        matches!(self.source, IssueSource::Chat) && self.channel_id.is_some()
    }

    /// Returns the linked discussion thread, if any.
    #[must_use]
    pub const fn thread(&self) -> Option<&ThreadLink> {
        self.thread.as_ref()
    }

    /// Returns the public link hash, if any.
    #[must_use]
    pub fn public_hash(&self) -> Option<&str> {
        self.public_hash.as_deref()
    }

    /// Returns the resolution notes.
    #[must_use]
    pub const fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Returns the report timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the close timestamp while the issue is closed.
    #[must_use]
    pub const fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Returns the row version.
    #[must_use]
    pub const fn version(&self) -> IssueVersion {
        self.version
    }

    /// Returns the statuses the issue may move to next.
    #[must_use]
    pub const fn next_statuses(&self) -> &'static [IssueStatus] {
        self.status.next_statuses()
    }

    /// Returns whether the issue may move to `target`.
    #[must_use]
    pub fn can_transition_to(&self, target: IssueStatus) -> bool {
        self.status.can_transition_to(target)
    }

    /// Moves the issue to `target` and returns the log entry for the change.
    ///
    /// Entering [`IssueStatus::Closed`] stamps `closed_at`; leaving it clears
    /// the stamp.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::InvalidTransition`] when the workflow table
    /// forbids the move. The issue is left untouched.
    pub fn transition_to(
        &mut self,
        target: IssueStatus,
        actor: Option<UserId>,
        clock: &impl Clock,
    ) -> Result<StatusLogEntry, IssueDomainError> {
        let from = self.status;
        if !from.can_transition_to(target) {
            return Err(IssueDomainError::InvalidTransition {
                issue_id: self.id,
                from,
                to: target,
            });
        }

        let timestamp = clock.utc();
        self.status = target;
        self.closed_at = (target == IssueStatus::Closed).then_some(timestamp);
        self.touch(timestamp);
        Ok(StatusLogEntry::recorded_at(
            self.id,
            Some(from),
            target,
            actor,
            timestamp,
        ))
    }

    /// Changes the priority.
    pub fn set_priority(&mut self, priority: Priority, clock: &impl Clock) {
        self.priority = priority;
        self.touch(clock.utc());
    }

    /// Links the chat thread the issue is discussed in.
    pub fn link_thread(&mut self, thread: ThreadLink, clock: &impl Clock) {
        self.thread = Some(thread);
        self.touch(clock.utc());
    }

    /// Records resolution notes.
    ///
    /// The notes are only meaningful together with the move to
    /// [`IssueStatus::Resolved`] and are persisted with it.
    pub(crate) fn record_resolution(&mut self, cause: Option<String>, action: Option<String>) {
        self.resolution = Resolution {
            cause: normalize_note(cause),
            action: normalize_note(action),
        };
    }

    fn touch(&mut self, timestamp: DateTime<Utc>) {
        self.updated_at = timestamp;
        self.version = self.version.next();
    }
}

fn normalize_note(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let normalized = raw.trim();
        (!normalized.is_empty()).then(|| normalized.to_owned())
    })
}

/// Derives the public link hash from the issue identity and report time.
fn public_hash_for(id: IssueId, reported_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.into_inner().as_bytes());
    hasher.update(reported_at.to_rfc3339().as_bytes());
    format!("{:x}", hasher.finalize())
}
