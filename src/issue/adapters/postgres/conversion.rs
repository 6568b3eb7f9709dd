//! Conversions between Diesel rows and domain types.

use super::models::{AssignmentRow, IssueRow, NewStatusLogRow, StatusLogRow, UserRow};
use crate::issue::domain::{
    AssigneeRole, AssignmentId, Issue, IssueAssignment, IssueDomainError, IssueId, IssueSource,
    IssueStatus, IssueVersion, PersistedAssignmentData, PersistedIssueData,
    PersistedStatusLogData, Priority, Resolution, StatusLogEntry, StatusLogId, ThreadLink,
};
use crate::tenancy::domain::{
    ChannelId, CustomerId, PersistedUserData, ProjectId, TenancyDomainError, User, UserId,
    UserRole,
};
use std::num::TryFromIntError;

/// Failure to map between rows and domain values.
#[derive(Debug, thiserror::Error)]
pub(super) enum ConversionError {
    /// A workflow enum column held an unknown value.
    #[error(transparent)]
    Domain(#[from] IssueDomainError),
    /// A user role column held an unknown value.
    #[error(transparent)]
    Tenancy(#[from] TenancyDomainError),
    /// A version did not fit the column or the domain type.
    #[error("version out of range: {0}")]
    Version(#[from] TryFromIntError),
    /// Only one of the thread columns was set.
    #[error("issue {0} has a partial thread link")]
    PartialThreadLink(IssueId),
}

pub(super) fn version_to_column(version: IssueVersion) -> Result<i64, ConversionError> {
    Ok(i64::try_from(version.value())?)
}

pub(super) fn issue_to_row(issue: &Issue) -> Result<IssueRow, ConversionError> {
    let (thread_id, message_id) = issue.thread().map_or((None, None), |thread| {
        (Some(thread.thread_id.clone()), Some(thread.message_id.clone()))
    });
    Ok(IssueRow {
        id: issue.id().into_inner(),
        project_id: issue.project_id().into_inner(),
        channel_id: issue.channel_id().map(ChannelId::into_inner),
        reporter_id: issue.reporter_id().into_inner(),
        legacy_assignee_id: issue.legacy_assignee_id().map(UserId::into_inner),
        title: issue.title().to_owned(),
        description: issue.description().to_owned(),
        image_url: issue.image_url().map(str::to_owned),
        priority: issue.priority().as_str().to_owned(),
        status: issue.status().as_str().to_owned(),
        source: issue.source().as_str().to_owned(),
        thread_id,
        message_id,
        public_hash: issue.public_hash().map(str::to_owned),
        resolution_cause: issue.resolution().cause.clone(),
        resolution_action: issue.resolution().action.clone(),
        created_at: issue.created_at(),
        updated_at: issue.updated_at(),
        closed_at: issue.closed_at(),
        version: version_to_column(issue.version())?,
    })
}

pub(super) fn row_to_issue(row: IssueRow) -> Result<Issue, ConversionError> {
    let id = IssueId::from_uuid(row.id);
    let thread = match (row.thread_id, row.message_id) {
        (Some(thread_id), Some(message_id)) => Some(ThreadLink {
            thread_id,
            message_id,
        }),
        (None, None) => None,
        _ => return Err(ConversionError::PartialThreadLink(id)),
    };

    Ok(Issue::from_persisted(PersistedIssueData {
        id,
        project_id: ProjectId::from_uuid(row.project_id),
        channel_id: row.channel_id.map(ChannelId::from_uuid),
        reporter_id: UserId::from_uuid(row.reporter_id),
        legacy_assignee_id: row.legacy_assignee_id.map(UserId::from_uuid),
        title: row.title,
        description: row.description,
        image_url: row.image_url,
        priority: Priority::try_from(row.priority.as_str())?,
        status: IssueStatus::try_from(row.status.as_str())?,
        source: IssueSource::try_from(row.source.as_str())?,
        thread,
        public_hash: row.public_hash,
        resolution: Resolution {
            cause: row.resolution_cause,
            action: row.resolution_action,
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
        closed_at: row.closed_at,
        version: IssueVersion::new(u64::try_from(row.version)?),
    }))
}

pub(super) fn entry_to_row(entry: &StatusLogEntry) -> NewStatusLogRow {
    NewStatusLogRow {
        id: entry.id().into_inner(),
        issue_id: entry.issue_id().into_inner(),
        old_status: entry.old_status().map(|status| status.as_str().to_owned()),
        new_status: entry.new_status().as_str().to_owned(),
        actor_id: entry.actor().map(UserId::into_inner),
        note: entry.note().map(str::to_owned),
        changed_at: entry.changed_at(),
    }
}

pub(super) fn row_to_entry(row: StatusLogRow) -> Result<StatusLogEntry, ConversionError> {
    let old_status = row
        .old_status
        .as_deref()
        .map(IssueStatus::try_from)
        .transpose()?;
    Ok(StatusLogEntry::from_persisted(PersistedStatusLogData {
        id: StatusLogId::from_uuid(row.id),
        issue_id: IssueId::from_uuid(row.issue_id),
        old_status,
        new_status: IssueStatus::try_from(row.new_status.as_str())?,
        actor: row.actor_id.map(UserId::from_uuid),
        note: row.note,
        changed_at: row.changed_at,
    }))
}

pub(super) fn assignment_to_row(assignment: &IssueAssignment) -> AssignmentRow {
    AssignmentRow {
        id: assignment.id().into_inner(),
        issue_id: assignment.issue_id().into_inner(),
        user_id: assignment.user_id().into_inner(),
        role: assignment.role().as_str().to_owned(),
        assigned_at: assignment.assigned_at(),
    }
}

pub(super) fn row_to_assignment(row: AssignmentRow) -> Result<IssueAssignment, ConversionError> {
    Ok(IssueAssignment::from_persisted(PersistedAssignmentData {
        id: AssignmentId::from_uuid(row.id),
        issue_id: IssueId::from_uuid(row.issue_id),
        user_id: UserId::from_uuid(row.user_id),
        role: AssigneeRole::try_from(row.role.as_str())?,
        assigned_at: row.assigned_at,
    }))
}

pub(super) fn row_to_user(row: UserRow) -> Result<User, ConversionError> {
    Ok(User::from_persisted(PersistedUserData {
        id: UserId::from_uuid(row.id),
        customer_id: row.customer_id.map(CustomerId::from_uuid),
        name: row.name,
        email: row.email,
        platform_user_id: row.platform_user_id,
        role: UserRole::try_from(row.role.as_str())?,
        created_at: row.created_at,
    }))
}
