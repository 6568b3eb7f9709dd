//! Roles a user can hold on an issue.

use super::IssueDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role tagging a user's assignment to an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssigneeRole {
    /// Developer fixing the issue.
    Dev,
    /// QA tester verifying the fix.
    Qa,
    /// Reviewer of the fix.
    Reviewer,
    /// Any other involvement.
    Other,
}

impl AssigneeRole {
    /// Every role.
    pub const ALL: [Self; 4] = [Self::Dev, Self::Qa, Self::Reviewer, Self::Other];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Qa => "qa",
            Self::Reviewer => "reviewer",
            Self::Other => "other",
        }
    }

    /// Returns a human-readable role name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Dev => "Developer",
            Self::Qa => "QA Tester",
            Self::Reviewer => "Reviewer",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for AssigneeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AssigneeRole {
    type Error = IssueDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "dev" => Ok(Self::Dev),
            "qa" => Ok(Self::Qa),
            "reviewer" => Ok(Self::Reviewer),
            "other" => Ok(Self::Other),
            _ => Err(IssueDomainError::InvalidRole(value.to_owned())),
        }
    }
}
