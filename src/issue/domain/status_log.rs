//! Immutable audit records of issue status changes.

use super::{IssueId, IssueStatus, StatusHistoryError, StatusLogId};
use crate::tenancy::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One accepted status change.
///
/// Entries are created exactly once per applied transition and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLogEntry {
    id: StatusLogId,
    issue_id: IssueId,
    old_status: Option<IssueStatus>,
    new_status: IssueStatus,
    actor: Option<UserId>,
    note: Option<String>,
    changed_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted status log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedStatusLogData {
    /// Persisted entry identifier.
    pub id: StatusLogId,
    /// Issue the entry belongs to.
    pub issue_id: IssueId,
    /// Status before the change; `None` only for the opening entry.
    pub old_status: Option<IssueStatus>,
    /// Status after the change.
    pub new_status: IssueStatus,
    /// User who triggered the change; `None` for system changes.
    pub actor: Option<UserId>,
    /// Free-text remark recorded with the change.
    pub note: Option<String>,
    /// Time of the change.
    pub changed_at: DateTime<Utc>,
}

impl StatusLogEntry {
    /// Records a status change at the current clock time.
    #[must_use]
    pub fn record(
        issue_id: IssueId,
        old_status: Option<IssueStatus>,
        new_status: IssueStatus,
        actor: Option<UserId>,
        clock: &impl Clock,
    ) -> Self {
        Self::recorded_at(issue_id, old_status, new_status, actor, clock.utc())
    }

    pub(crate) fn recorded_at(
        issue_id: IssueId,
        old_status: Option<IssueStatus>,
        new_status: IssueStatus,
        actor: Option<UserId>,
        changed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: StatusLogId::new(),
            issue_id,
            old_status,
            new_status,
            actor,
            note: None,
            changed_at,
        }
    }

    /// Attaches a free-text remark such as a rejection reason.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let value = note.into();
        let normalized = value.trim();
        self.note = (!normalized.is_empty()).then_some(normalized.to_owned());
        self
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedStatusLogData) -> Self {
        Self {
            id: data.id,
            issue_id: data.issue_id,
            old_status: data.old_status,
            new_status: data.new_status,
            actor: data.actor,
            note: data.note,
            changed_at: data.changed_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> StatusLogId {
        self.id
    }

    /// Returns the issue the entry belongs to.
    #[must_use]
    pub const fn issue_id(&self) -> IssueId {
        self.issue_id
    }

    /// Returns the status before the change.
    #[must_use]
    pub const fn old_status(&self) -> Option<IssueStatus> {
        self.old_status
    }

    /// Returns the status after the change.
    #[must_use]
    pub const fn new_status(&self) -> IssueStatus {
        self.new_status
    }

    /// Returns the user who triggered the change.
    #[must_use]
    pub const fn actor(&self) -> Option<UserId> {
        self.actor
    }

    /// Returns the remark recorded with the change.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns the time of the change.
    #[must_use]
    pub const fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }
}

/// Replays an oldest-first history and returns the statuses it passed
/// through.
///
/// Each entry's previous status must equal the status produced by the entry
/// before it, and the first entry must start from nothing.
///
/// # Errors
///
/// Returns [`StatusHistoryError`] at the first entry that does not chain.
pub fn replay_history<'a>(
    entries: impl IntoIterator<Item = &'a StatusLogEntry>,
) -> Result<Vec<IssueStatus>, StatusHistoryError> {
    let mut current: Option<IssueStatus> = None;
    let mut replayed = Vec::new();
    for (position, entry) in entries.into_iter().enumerate() {
        if entry.old_status() != current {
            return Err(StatusHistoryError {
                position,
                expected: current,
                found: entry.old_status(),
            });
        }
        current = Some(entry.new_status());
        replayed.push(entry.new_status());
    }
    Ok(replayed)
}
