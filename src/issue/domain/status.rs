//! Issue status vocabulary and the workflow transition table.
//!
//! The table is a `const` lookup keyed by status; it never changes at
//! runtime and can be consulted from any thread without synchronization.

use super::IssueDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Reported and awaiting triage. Every issue starts here.
    Open,
    /// A developer has been assigned.
    AssignedDev,
    /// The developer is working on a fix.
    InProgress,
    /// The developer considers the issue fixed.
    Resolved,
    /// A QA tester has been assigned to verify the fix.
    AssignedQa,
    /// QA confirmed the fix.
    Verified,
    /// The issue is closed. Only `Reopened` may follow.
    Closed,
    /// QA rejected the fix.
    Rejected,
    /// A closed issue was reopened.
    Reopened,
}

impl IssueStatus {
    /// Every status, in workflow order followed by the side states.
    pub const ALL: [Self; 9] = [
        Self::Open,
        Self::AssignedDev,
        Self::InProgress,
        Self::Resolved,
        Self::AssignedQa,
        Self::Verified,
        Self::Closed,
        Self::Rejected,
        Self::Reopened,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::AssignedDev => "assigned_dev",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::AssignedQa => "assigned_qa",
            Self::Verified => "verified",
            Self::Closed => "closed",
            Self::Rejected => "rejected",
            Self::Reopened => "reopened",
        }
    }

    /// Returns the statuses this status may move to, in display order.
    #[must_use]
    pub const fn next_statuses(self) -> &'static [Self] {
        match self {
            Self::Open => &[Self::AssignedDev, Self::Closed],
            Self::AssignedDev => &[Self::InProgress, Self::Open, Self::Closed],
            Self::InProgress => &[Self::Resolved, Self::AssignedDev, Self::Open],
            Self::Resolved => &[Self::AssignedQa, Self::Closed, Self::InProgress],
            Self::AssignedQa => &[Self::Verified, Self::Rejected, Self::Resolved],
            Self::Verified => &[Self::Closed, Self::Rejected],
            Self::Rejected => &[Self::AssignedDev, Self::InProgress, Self::Open],
            Self::Closed => &[Self::Reopened],
            Self::Reopened => &[Self::Open, Self::AssignedDev],
        }
    }

    /// Returns whether the workflow allows moving from `self` to `target`.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next_statuses().contains(&target)
    }

    /// Returns the successors of a raw stored status.
    ///
    /// Unrecognized values have no outgoing edges and yield an empty slice.
    #[must_use]
    pub fn successors_of(value: &str) -> &'static [Self] {
        match Self::try_from(value) {
            Ok(status) => status.next_statuses(),
            Err(_) => &[],
        }
    }

    /// Returns a human-readable name for UI display.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::AssignedDev => "Assigned to Developer",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::AssignedQa => "Assigned to QA",
            Self::Verified => "Verified",
            Self::Closed => "Closed",
            Self::Rejected => "Rejected by QA",
            Self::Reopened => "Reopened",
        }
    }

    /// Returns the 1–7 rank along the primary open-to-closed path.
    ///
    /// `Rejected` and `Reopened` sit off the primary path and rank 0.
    #[must_use]
    pub const fn workflow_stage(self) -> u8 {
        match self {
            Self::Open => 1,
            Self::AssignedDev => 2,
            Self::InProgress => 3,
            Self::Resolved => 4,
            Self::AssignedQa => 5,
            Self::Verified => 6,
            Self::Closed => 7,
            Self::Rejected | Self::Reopened => 0,
        }
    }

    /// Returns the hex colour used when rendering the status.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Open => "#6c757d",
            Self::AssignedDev => "#17a2b8",
            Self::InProgress => "#ffc107",
            Self::Resolved => "#28a745",
            Self::AssignedQa => "#007bff",
            Self::Verified => "#20c997",
            Self::Closed => "#6f42c1",
            Self::Rejected => "#dc3545",
            Self::Reopened => "#fd7e14",
        }
    }

    /// Returns whether the status is terminal unless reopened.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns whether the issue still needs attention.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// Returns whether the issue is with development.
    #[must_use]
    pub const fn is_dev_phase(self) -> bool {
        matches!(self, Self::AssignedDev | Self::InProgress | Self::Resolved)
    }

    /// Returns whether the issue is with QA.
    #[must_use]
    pub const fn is_qa_phase(self) -> bool {
        matches!(self, Self::AssignedQa | Self::Verified | Self::Rejected)
    }

    /// Returns whether the status belongs to the legacy open/closed pair.
    ///
    /// Older clients only understand these two values; the workflow table
    /// remains authoritative for transitions.
    #[must_use]
    pub const fn is_legacy(self) -> bool {
        matches!(self, Self::Open | Self::Closed)
    }
}

/// Returns whether a transition is legal.
///
/// `from = None` means the issue does not exist yet; the only legal target is
/// [`IssueStatus::Open`].
#[must_use]
pub fn is_transition_valid(from: Option<IssueStatus>, to: IssueStatus) -> bool {
    from.map_or(to == IssueStatus::Open, |current| {
        current.can_transition_to(to)
    })
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for IssueStatus {
    type Error = IssueDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "assigned_dev" => Ok(Self::AssignedDev),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "assigned_qa" => Ok(Self::AssignedQa),
            "verified" => Ok(Self::Verified),
            "closed" => Ok(Self::Closed),
            "rejected" => Ok(Self::Rejected),
            "reopened" => Ok(Self::Reopened),
            _ => Err(IssueDomainError::InvalidStatus(value.to_owned())),
        }
    }
}
