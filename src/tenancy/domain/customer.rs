//! Customer organisation entity.

use super::{CustomerId, TenancyDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A customer organisation that owns projects and users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    contact_email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Customer {
    /// Creates a new customer.
    ///
    /// # Errors
    ///
    /// Returns [`TenancyDomainError::EmptyCustomerName`] when the name is
    /// blank.
    pub fn new(name: impl Into<String>, clock: &impl Clock) -> Result<Self, TenancyDomainError> {
        let raw = name.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TenancyDomainError::EmptyCustomerName);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: CustomerId::new(),
            name: normalized.to_owned(),
            contact_email: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Sets the contact email address.
    #[must_use]
    pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
        let value = email.into();
        let normalized = value.trim();
        self.contact_email = (!normalized.is_empty()).then_some(normalized.to_owned());
        self
    }

    /// Returns the customer identifier.
    #[must_use]
    pub const fn id(&self) -> CustomerId {
        self.id
    }

    /// Returns the customer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the contact email, if any.
    #[must_use]
    pub fn contact_email(&self) -> Option<&str> {
        self.contact_email.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
