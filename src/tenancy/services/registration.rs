//! Customer, project, user, and channel registration.

use crate::tenancy::{
    domain::{
        Channel, ChannelId, Customer, CustomerId, PlatformChannel, Project, ProjectId,
        TenancyDomainError, User, UserId, UserRole,
    },
    ports::{
        ChannelRepository, CustomerRepository, ProjectRepository, TenancyRepositoryError,
        UserRepository,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a chat channel against a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterChannelRequest {
    project_id: ProjectId,
    platform_channel_id: String,
    guild_id: String,
    registrant_platform_id: String,
    registrant_name: Option<String>,
    channel_type: Option<String>,
}

impl RegisterChannelRequest {
    /// Creates a request with the required registration fields.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        platform_channel_id: impl Into<String>,
        guild_id: impl Into<String>,
        registrant_platform_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id,
            platform_channel_id: platform_channel_id.into(),
            guild_id: guild_id.into(),
            registrant_platform_id: registrant_platform_id.into(),
            registrant_name: None,
            channel_type: None,
        }
    }

    /// Sets the registrant's display name, used if the user is new.
    #[must_use]
    pub fn with_registrant_name(mut self, name: impl Into<String>) -> Self {
        self.registrant_name = Some(name.into());
        self
    }

    /// Sets the channel type label.
    #[must_use]
    pub fn with_channel_type(mut self, channel_type: impl Into<String>) -> Self {
        self.channel_type = Some(channel_type.into());
        self
    }
}

/// Service-level errors for tenancy operations.
#[derive(Debug, Clone, Error)]
pub enum TenancyError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TenancyDomainError),

    /// The customer does not exist.
    #[error("customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// No registration exists for the platform channel.
    #[error("channel is not registered: {0}")]
    ChannelNotRegistered(String),

    /// The platform channel is already registered.
    #[error("channel is already registered: {0}")]
    ChannelAlreadyRegistered(String),

    /// The registration exists but is deactivated.
    #[error("channel {0} is not active")]
    ChannelInactive(ChannelId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TenancyRepositoryError),
}

/// Result type for tenancy service operations.
pub type TenancyResult<T> = Result<T, TenancyError>;

/// Registration and lookup of customers, projects, users, and channels.
#[derive(Clone)]
pub struct TenancyService<R, C>
where
    R: CustomerRepository + ProjectRepository + ChannelRepository + UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TenancyService<R, C>
where
    R: CustomerRepository + ProjectRepository + ChannelRepository + UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new tenancy service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a customer organisation.
    ///
    /// # Errors
    ///
    /// Returns [`TenancyError::Domain`] when the name is blank, or a
    /// repository error.
    pub async fn create_customer(
        &self,
        name: &str,
        contact_email: Option<&str>,
    ) -> TenancyResult<Customer> {
        let mut customer = Customer::new(name, &*self.clock)?;
        if let Some(email) = contact_email {
            customer = customer.with_contact_email(email);
        }
        self.repository.store_customer(&customer).await?;
        tracing::debug!(customer_id = %customer.id(), "customer created");
        Ok(customer)
    }

    /// Creates a project under an existing customer.
    ///
    /// # Errors
    ///
    /// Returns [`TenancyError::CustomerNotFound`] when the customer is
    /// unknown, [`TenancyError::Domain`] when the name is blank, or a
    /// repository error.
    pub async fn create_project(
        &self,
        customer_id: CustomerId,
        name: &str,
        description: Option<&str>,
    ) -> TenancyResult<Project> {
        if self.repository.find_customer(customer_id).await?.is_none() {
            return Err(TenancyError::CustomerNotFound(customer_id));
        }
        let mut project = Project::new(customer_id, name, &*self.clock)?;
        if let Some(text) = description {
            project = project.with_description(text);
        }
        self.repository.store_project(&project).await?;
        tracing::debug!(
            project_id = %project.id(),
            customer_id = %customer_id,
            "project created"
        );
        Ok(project)
    }

    /// Returns a customer's projects, newest first.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the lookup fails.
    pub async fn projects_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> TenancyResult<Vec<Project>> {
        Ok(self.repository.projects_for_customer(customer_id).await?)
    }

    /// Returns the user with the platform identifier, creating a customer
    /// role user if none exists.
    ///
    /// # Errors
    ///
    /// Returns [`TenancyError::Domain`] when the identifier is blank, or a
    /// repository error.
    pub async fn get_or_create_user(
        &self,
        platform_user_id: &str,
        name: Option<&str>,
    ) -> TenancyResult<User> {
        if let Some(existing) = self
            .repository
            .find_user_by_platform_id(platform_user_id.trim())
            .await?
        {
            return Ok(existing);
        }

        let mut user = User::new(platform_user_id, UserRole::Customer, &*self.clock)?;
        if let Some(display_name) = name {
            user = user.with_name(display_name);
        }
        match self.repository.store_user(&user).await {
            Ok(()) => {
                tracing::debug!(user_id = %user.id(), "user created");
                Ok(user)
            }
            // Another request created the user between lookup and insert.
            Err(TenancyRepositoryError::DuplicateUser(platform_id)) => {
                let raced = self
                    .repository
                    .find_user_by_platform_id(&platform_id)
                    .await?;
                raced.ok_or(TenancyError::Repository(
                    TenancyRepositoryError::DuplicateUser(platform_id),
                ))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Returns a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TenancyError::UserNotFound`] when the user is unknown.
    pub async fn get_user(&self, user_id: UserId) -> TenancyResult<User> {
        self.repository
            .find_user_by_id(user_id)
            .await?
            .ok_or(TenancyError::UserNotFound(user_id))
    }

    /// Registers a chat channel against a project.
    ///
    /// The registrant is looked up by platform identifier and created if
    /// new.
    ///
    /// # Errors
    ///
    /// Returns [`TenancyError::ProjectNotFound`],
    /// [`TenancyError::ChannelAlreadyRegistered`], [`TenancyError::Domain`]
    /// for blank platform identifiers, or a repository error.
    pub async fn register_channel(
        &self,
        request: RegisterChannelRequest,
    ) -> TenancyResult<Channel> {
        let platform = PlatformChannel::new(request.platform_channel_id, request.guild_id)?;
        if self
            .repository
            .find_project(request.project_id)
            .await?
            .is_none()
        {
            return Err(TenancyError::ProjectNotFound(request.project_id));
        }
        if self
            .repository
            .find_channel_by_platform_id(platform.channel_id())
            .await?
            .is_some()
        {
            return Err(TenancyError::ChannelAlreadyRegistered(
                platform.channel_id().to_owned(),
            ));
        }

        let registrant = self
            .get_or_create_user(
                &request.registrant_platform_id,
                request.registrant_name.as_deref(),
            )
            .await?;
        let mut channel =
            Channel::register(request.project_id, platform, registrant.id(), &*self.clock);
        if let Some(channel_type) = request.channel_type {
            channel = channel.with_channel_type(channel_type);
        }

        self.repository
            .store_channel(&channel)
            .await
            .map_err(|err| match err {
                TenancyRepositoryError::DuplicateChannel(platform_id) => {
                    TenancyError::ChannelAlreadyRegistered(platform_id)
                }
                other => other.into(),
            })?;
        tracing::debug!(
            channel_id = %channel.id(),
            project_id = %channel.project_id(),
            "channel registered"
        );
        Ok(channel)
    }

    /// Returns the registration for a platform channel, active or not.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the lookup fails.
    pub async fn channel_registration(
        &self,
        platform_channel_id: &str,
    ) -> TenancyResult<Option<Channel>> {
        Ok(self
            .repository
            .find_channel_by_platform_id(platform_channel_id)
            .await?)
    }

    /// Returns the active registration for a platform channel.
    ///
    /// # Errors
    ///
    /// Returns [`TenancyError::ChannelNotRegistered`] when the channel is
    /// unknown or [`TenancyError::ChannelInactive`] when it is deactivated.
    pub async fn resolve_active_channel(&self, platform_channel_id: &str) -> TenancyResult<Channel> {
        let channel = self.require_channel(platform_channel_id).await?;
        if !channel.is_active() {
            return Err(TenancyError::ChannelInactive(channel.id()));
        }
        Ok(channel)
    }

    /// Deactivates a registration. Issues can no longer be reported from it.
    ///
    /// # Errors
    ///
    /// Returns [`TenancyError::ChannelNotRegistered`] when the channel is
    /// unknown, or a repository error.
    pub async fn deactivate_channel(&self, platform_channel_id: &str) -> TenancyResult<Channel> {
        let mut channel = self.require_channel(platform_channel_id).await?;
        channel.deactivate(&*self.clock);
        self.repository.update_channel(&channel).await?;
        tracing::debug!(channel_id = %channel.id(), "channel deactivated");
        Ok(channel)
    }

    /// Reactivates a registration.
    ///
    /// # Errors
    ///
    /// As [`TenancyService::deactivate_channel`].
    pub async fn activate_channel(&self, platform_channel_id: &str) -> TenancyResult<Channel> {
        let mut channel = self.require_channel(platform_channel_id).await?;
        channel.activate(&*self.clock);
        self.repository.update_channel(&channel).await?;
        tracing::debug!(channel_id = %channel.id(), "channel activated");
        Ok(channel)
    }

    /// Moves a registration to another project.
    ///
    /// Issues already reported keep their original project.
    ///
    /// # Errors
    ///
    /// Returns [`TenancyError::ChannelNotRegistered`],
    /// [`TenancyError::ProjectNotFound`], or a repository error.
    pub async fn move_channel(
        &self,
        platform_channel_id: &str,
        project_id: ProjectId,
    ) -> TenancyResult<Channel> {
        if self.repository.find_project(project_id).await?.is_none() {
            return Err(TenancyError::ProjectNotFound(project_id));
        }
        let mut channel = self.require_channel(platform_channel_id).await?;
        channel.reassign(project_id, &*self.clock);
        self.repository.update_channel(&channel).await?;
        tracing::debug!(
            channel_id = %channel.id(),
            project_id = %project_id,
            "channel moved"
        );
        Ok(channel)
    }

    /// Returns a project's registrations, newest first.
    ///
    /// # Errors
    ///
    /// Returns a repository error when the lookup fails.
    pub async fn channels_for_project(&self, project_id: ProjectId) -> TenancyResult<Vec<Channel>> {
        Ok(self.repository.channels_for_project(project_id).await?)
    }

    async fn require_channel(&self, platform_channel_id: &str) -> TenancyResult<Channel> {
        self.repository
            .find_channel_by_platform_id(platform_channel_id)
            .await?
            .ok_or_else(|| TenancyError::ChannelNotRegistered(platform_channel_id.to_owned()))
    }
}
