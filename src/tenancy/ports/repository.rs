//! Repository ports for customers, projects, channels, and users.

use crate::tenancy::domain::{
    Channel, ChannelId, Customer, CustomerId, Project, ProjectId, User, UserId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for tenancy repository operations.
pub type TenancyRepositoryResult<T> = Result<T, TenancyRepositoryError>;

/// Customer persistence contract.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Stores a new customer.
    ///
    /// # Errors
    ///
    /// Returns [`TenancyRepositoryError::DuplicateCustomer`] when the
    /// identifier already exists.
    async fn store_customer(&self, customer: &Customer) -> TenancyRepositoryResult<()>;

    /// Finds a customer by identifier.
    async fn find_customer(&self, id: CustomerId) -> TenancyRepositoryResult<Option<Customer>>;
}

/// Project persistence contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`TenancyRepositoryError::DuplicateProject`] when the
    /// identifier already exists.
    async fn store_project(&self, project: &Project) -> TenancyRepositoryResult<()>;

    /// Finds a project by identifier.
    async fn find_project(&self, id: ProjectId) -> TenancyRepositoryResult<Option<Project>>;

    /// Returns a customer's projects, newest first.
    async fn projects_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> TenancyRepositoryResult<Vec<Project>>;
}

/// Registered channel persistence contract.
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Stores a new channel registration.
    ///
    /// # Errors
    ///
    /// Returns [`TenancyRepositoryError::DuplicateChannel`] when the platform
    /// channel is already registered.
    async fn store_channel(&self, channel: &Channel) -> TenancyRepositoryResult<()>;

    /// Persists changes to a registration.
    ///
    /// # Errors
    ///
    /// Returns [`TenancyRepositoryError::ChannelNotFound`] when the
    /// registration does not exist.
    async fn update_channel(&self, channel: &Channel) -> TenancyRepositoryResult<()>;

    /// Finds a registration by identifier.
    async fn find_channel(&self, id: ChannelId) -> TenancyRepositoryResult<Option<Channel>>;

    /// Finds a registration by chat platform channel identifier.
    async fn find_channel_by_platform_id(
        &self,
        platform_channel_id: &str,
    ) -> TenancyRepositoryResult<Option<Channel>>;

    /// Returns a project's registrations, newest first.
    async fn channels_for_project(
        &self,
        project_id: ProjectId,
    ) -> TenancyRepositoryResult<Vec<Channel>>;
}

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`TenancyRepositoryError::DuplicateUser`] when the platform
    /// user identifier is already taken.
    async fn store_user(&self, user: &User) -> TenancyRepositoryResult<()>;

    /// Finds a user by identifier.
    async fn find_user_by_id(&self, id: UserId) -> TenancyRepositoryResult<Option<User>>;

    /// Finds a user by chat platform user identifier.
    async fn find_user_by_platform_id(
        &self,
        platform_user_id: &str,
    ) -> TenancyRepositoryResult<Option<User>>;
}

/// Errors returned by tenancy repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TenancyRepositoryError {
    /// A customer with the same identifier already exists.
    #[error("duplicate customer identifier: {0}")]
    DuplicateCustomer(CustomerId),

    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// The platform channel is already registered.
    #[error("platform channel already registered: {0}")]
    DuplicateChannel(String),

    /// The platform user identifier is already taken.
    #[error("platform user already exists: {0}")]
    DuplicateUser(String),

    /// The channel registration was not found.
    #[error("channel not found: {0}")]
    ChannelNotFound(ChannelId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TenancyRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
