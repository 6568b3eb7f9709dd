//! In-memory tenancy store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::issue::ports::{UserDirectory, UserDirectoryError, UserDirectoryResult};
use crate::tenancy::{
    domain::{Channel, ChannelId, Customer, CustomerId, Project, ProjectId, User, UserId},
    ports::{
        ChannelRepository, CustomerRepository, ProjectRepository, TenancyRepositoryError,
        TenancyRepositoryResult, UserRepository,
    },
};

/// Thread-safe in-memory store for every tenancy port.
///
/// It also serves as the workflow's [`UserDirectory`]. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTenancyStore {
    state: Arc<RwLock<TenancyState>>,
}

#[derive(Debug, Default)]
struct TenancyState {
    customers: HashMap<CustomerId, Customer>,
    projects: Vec<Project>,
    channels: Vec<Channel>,
    users: HashMap<UserId, User>,
    user_platform_index: HashMap<String, UserId>,
}

impl InMemoryTenancyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error<T>(err: PoisonError<T>) -> TenancyRepositoryError {
    TenancyRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl CustomerRepository for InMemoryTenancyStore {
    async fn store_customer(&self, customer: &Customer) -> TenancyRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.customers.contains_key(&customer.id()) {
            return Err(TenancyRepositoryError::DuplicateCustomer(customer.id()));
        }
        state.customers.insert(customer.id(), customer.clone());
        Ok(())
    }

    async fn find_customer(&self, id: CustomerId) -> TenancyRepositoryResult<Option<Customer>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.customers.get(&id).cloned())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryTenancyStore {
    async fn store_project(&self, project: &Project) -> TenancyRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.projects.iter().any(|existing| existing.id() == project.id()) {
            return Err(TenancyRepositoryError::DuplicateProject(project.id()));
        }
        state.projects.push(project.clone());
        Ok(())
    }

    async fn find_project(&self, id: ProjectId) -> TenancyRepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.projects.iter().find(|project| project.id() == id).cloned())
    }

    async fn projects_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> TenancyRepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .projects
            .iter()
            .rev()
            .filter(|project| project.customer_id() == customer_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ChannelRepository for InMemoryTenancyStore {
    async fn store_channel(&self, channel: &Channel) -> TenancyRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let taken = state
            .channels
            .iter()
            .any(|existing| existing.platform_channel_id() == channel.platform_channel_id());
        if taken {
            return Err(TenancyRepositoryError::DuplicateChannel(
                channel.platform_channel_id().to_owned(),
            ));
        }
        state.channels.push(channel.clone());
        Ok(())
    }

    async fn update_channel(&self, channel: &Channel) -> TenancyRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let slot = state
            .channels
            .iter_mut()
            .find(|existing| existing.id() == channel.id())
            .ok_or(TenancyRepositoryError::ChannelNotFound(channel.id()))?;
        *slot = channel.clone();
        Ok(())
    }

    async fn find_channel(&self, id: ChannelId) -> TenancyRepositoryResult<Option<Channel>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.channels.iter().find(|channel| channel.id() == id).cloned())
    }

    async fn find_channel_by_platform_id(
        &self,
        platform_channel_id: &str,
    ) -> TenancyRepositoryResult<Option<Channel>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .channels
            .iter()
            .find(|channel| channel.platform_channel_id() == platform_channel_id)
            .cloned())
    }

    async fn channels_for_project(
        &self,
        project_id: ProjectId,
    ) -> TenancyRepositoryResult<Vec<Channel>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .channels
            .iter()
            .rev()
            .filter(|channel| channel.project_id() == project_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryTenancyStore {
    async fn store_user(&self, user: &User) -> TenancyRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state
            .user_platform_index
            .contains_key(user.platform_user_id())
        {
            return Err(TenancyRepositoryError::DuplicateUser(
                user.platform_user_id().to_owned(),
            ));
        }
        state
            .user_platform_index
            .insert(user.platform_user_id().to_owned(), user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, id: UserId) -> TenancyRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_user_by_platform_id(
        &self,
        platform_user_id: &str,
    ) -> TenancyRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .user_platform_index
            .get(platform_user_id)
            .and_then(|id| state.users.get(id))
            .cloned())
    }
}

#[async_trait]
impl UserDirectory for InMemoryTenancyStore {
    async fn find_user(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        self.find_user_by_id(id)
            .await
            .map_err(UserDirectoryError::persistence)
    }
}
