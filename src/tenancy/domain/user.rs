//! System user entity and platform roles.

use super::{CustomerId, TenancyDomainError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform-wide role of a user.
///
/// This is unrelated to the per-issue assignee role used by the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// A customer-side user who reports issues.
    Customer,
    /// A support engineer.
    Support,
    /// An administrator.
    Admin,
}

impl UserRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Support => "support",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UserRole {
    type Error = TenancyDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "customer" => Ok(Self::Customer),
            "support" => Ok(Self::Support),
            "admin" => Ok(Self::Admin),
            _ => Err(TenancyDomainError::InvalidUserRole(value.to_owned())),
        }
    }
}

/// A person known to the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    customer_id: Option<CustomerId>,
    name: Option<String>,
    email: Option<String>,
    platform_user_id: String,
    role: UserRole,
    is_internal: bool,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Owning customer, if any.
    pub customer_id: Option<CustomerId>,
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Chat platform user identifier.
    pub platform_user_id: String,
    /// Platform role.
    pub role: UserRole,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            customer_id: data.customer_id,
            name: data.name,
            email: data.email,
            platform_user_id: data.platform_user_id,
            role: data.role,
            is_internal: !matches!(data.role, UserRole::Customer),
            created_at: data.created_at,
        }
    }

    /// Creates a user identified by their chat platform user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TenancyDomainError::EmptyPlatformUserId`] when the platform
    /// identifier is blank.
    pub fn new(
        platform_user_id: impl Into<String>,
        role: UserRole,
        clock: &impl Clock,
    ) -> Result<Self, TenancyDomainError> {
        let raw = platform_user_id.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TenancyDomainError::EmptyPlatformUserId);
        }
        Ok(Self {
            id: UserId::new(),
            customer_id: None,
            name: None,
            email: None,
            platform_user_id: normalized.to_owned(),
            role,
            is_internal: !matches!(role, UserRole::Customer),
            created_at: clock.utc(),
        })
    }

    /// Links the user to a customer organisation.
    #[must_use]
    pub const fn with_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let value = name.into();
        let normalized = value.trim();
        self.name = (!normalized.is_empty()).then_some(normalized.to_owned());
        self
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        let value = email.into();
        let normalized = value.trim();
        self.email = (!normalized.is_empty()).then_some(normalized.to_owned());
        self
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the linked customer, if any.
    #[must_use]
    pub const fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id
    }

    /// Returns the display name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the email address, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the chat platform user identifier.
    #[must_use]
    pub fn platform_user_id(&self) -> &str {
        &self.platform_user_id
    }

    /// Returns the platform role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Returns whether the user is staff rather than a customer.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        self.is_internal
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns whether the user may manage a project owned by the customer.
    ///
    /// Staff may manage any project; customer users only their own
    /// organisation's.
    #[must_use]
    pub fn can_manage_project(&self, project_customer: CustomerId) -> bool {
        match self.role {
            UserRole::Admin | UserRole::Support => true,
            UserRole::Customer => self.customer_id == Some(project_customer),
        }
    }
}
