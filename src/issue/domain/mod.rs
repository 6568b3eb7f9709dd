//! Domain model for the issue status workflow.
//!
//! The workflow domain covers the status transition table, the issue
//! aggregate that enforces it, the append-only status log, and role-tagged
//! assignments. Infrastructure concerns stay outside this boundary.

mod assignment;
mod error;
mod ids;
mod issue;
mod priority;
mod role;
mod source;
mod status;
mod status_log;

pub use assignment::{AssignmentRoster, IssueAssignment, PersistedAssignmentData};
pub use error::{IssueDomainError, StatusHistoryError};
pub use ids::{AssignmentId, IssueId, IssueVersion, StatusLogId};
pub use issue::{Issue, IssueReport, PersistedIssueData, Resolution, ThreadLink};
pub use priority::Priority;
pub use role::AssigneeRole;
pub use source::IssueSource;
pub use status::{IssueStatus, is_transition_valid};
pub use status_log::{PersistedStatusLogData, StatusLogEntry, replay_history};
