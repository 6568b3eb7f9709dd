//! Diesel row models for issue workflow persistence.

use super::schema::{issue_assignees, issue_status_logs, issues, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Query result and insert row for issue records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = issues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct IssueRow {
    /// Issue identifier.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Registered channel the issue came from.
    pub channel_id: Option<Uuid>,
    /// Reporting user.
    pub reporter_id: Uuid,
    /// Deprecated single assignee.
    pub legacy_assignee_id: Option<Uuid>,
    /// Issue title.
    pub title: String,
    /// Issue description.
    pub description: String,
    /// Image reference.
    pub image_url: Option<String>,
    /// Priority.
    pub priority: String,
    /// Workflow status.
    pub status: String,
    /// Intake source.
    pub source: String,
    /// Linked chat thread.
    pub thread_id: Option<String>,
    /// Message that opened the linked thread.
    pub message_id: Option<String>,
    /// Public link hash.
    pub public_hash: Option<String>,
    /// Recorded resolution cause.
    pub resolution_cause: Option<String>,
    /// Recorded resolution action.
    pub resolution_action: Option<String>,
    /// Report timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Close timestamp.
    pub closed_at: Option<DateTime<Utc>>,
    /// Optimistic concurrency version.
    pub version: i64,
}

/// Query result row for status log entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = issue_status_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StatusLogRow {
    /// Entry identifier.
    pub id: Uuid,
    /// Issue the entry belongs to.
    pub issue_id: Uuid,
    /// Status before the change.
    pub old_status: Option<String>,
    /// Status after the change.
    pub new_status: String,
    /// User who triggered the change.
    pub actor_id: Option<Uuid>,
    /// Optional free-text note.
    pub note: Option<String>,
    /// Change timestamp.
    pub changed_at: DateTime<Utc>,
}

/// Insert model for status log entries.
///
/// `seq` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = issue_status_logs)]
pub struct NewStatusLogRow {
    /// Entry identifier.
    pub id: Uuid,
    /// Issue the entry belongs to.
    pub issue_id: Uuid,
    /// Status before the change.
    pub old_status: Option<String>,
    /// Status after the change.
    pub new_status: String,
    /// User who triggered the change.
    pub actor_id: Option<Uuid>,
    /// Optional free-text note.
    pub note: Option<String>,
    /// Change timestamp.
    pub changed_at: DateTime<Utc>,
}

/// Query result and insert row for assignments.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = issue_assignees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AssignmentRow {
    /// Assignment identifier.
    pub id: Uuid,
    /// Assigned issue.
    pub issue_id: Uuid,
    /// Assigned user.
    pub user_id: Uuid,
    /// Assignee role.
    pub role: String,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
}

/// Query result row for users.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: Uuid,
    /// Owning customer.
    pub customer_id: Option<Uuid>,
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Chat platform user identifier.
    pub platform_user_id: String,
    /// Platform role.
    pub role: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
