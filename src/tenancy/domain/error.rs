//! Error types for tenant entity validation and parsing.

use thiserror::Error;

/// Errors returned while constructing tenant domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TenancyDomainError {
    /// The customer name is empty after trimming.
    #[error("customer name must not be empty")]
    EmptyCustomerName,

    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The chat platform channel identifier is empty after trimming.
    #[error("platform channel identifier must not be empty")]
    EmptyPlatformChannelId,

    /// The chat platform guild identifier is empty after trimming.
    #[error("guild identifier must not be empty")]
    EmptyGuildId,

    /// The chat platform user identifier is empty after trimming.
    #[error("platform user identifier must not be empty")]
    EmptyPlatformUserId,

    /// The user role value is unsupported.
    #[error("invalid user role: {0}")]
    InvalidUserRole(String),
}
