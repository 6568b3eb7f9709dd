//! Where an issue was reported from.

use super::IssueDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Intake channel of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSource {
    /// Reported through the web portal.
    Web,
    /// Reported from a registered chat channel.
    Chat,
}

impl IssueSource {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Chat => "chat",
        }
    }
}

impl fmt::Display for IssueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for IssueSource {
    type Error = IssueDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "web" => Ok(Self::Web),
            // Rows written before the source was made platform-neutral.
            "chat" | "discord" => Ok(Self::Chat),
            _ => Err(IssueDomainError::InvalidSource(value.to_owned())),
        }
    }
}
