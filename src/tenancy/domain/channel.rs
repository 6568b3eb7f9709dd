//! Registered chat channel entity.

use super::{ChannelId, ProjectId, TenancyDomainError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Chat platform coordinates for a channel registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformChannel {
    channel_id: String,
    guild_id: String,
}

impl PlatformChannel {
    /// Creates validated platform coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`TenancyDomainError::EmptyPlatformChannelId`] or
    /// [`TenancyDomainError::EmptyGuildId`] when either value is blank.
    pub fn new(
        channel_id: impl Into<String>,
        guild_id: impl Into<String>,
    ) -> Result<Self, TenancyDomainError> {
        let raw_channel = channel_id.into();
        let raw_guild = guild_id.into();
        let channel = raw_channel.trim();
        let guild = raw_guild.trim();
        if channel.is_empty() {
            return Err(TenancyDomainError::EmptyPlatformChannelId);
        }
        if guild.is_empty() {
            return Err(TenancyDomainError::EmptyGuildId);
        }
        Ok(Self {
            channel_id: channel.to_owned(),
            guild_id: guild.to_owned(),
        })
    }

    /// Returns the platform channel identifier.
    #[must_use]
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Returns the platform guild identifier.
    #[must_use]
    pub fn guild_id(&self) -> &str {
        &self.guild_id
    }
}

/// A chat channel registered against a project.
///
/// Issues reported from the channel are filed under the channel's project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    id: ChannelId,
    project_id: ProjectId,
    platform_channel_id: String,
    guild_id: String,
    registered_by: UserId,
    is_active: bool,
    channel_type: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Channel {
    /// Registers a platform channel against a project.
    #[must_use]
    pub fn register(
        project_id: ProjectId,
        platform: PlatformChannel,
        registered_by: UserId,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ChannelId::new(),
            project_id,
            platform_channel_id: platform.channel_id,
            guild_id: platform.guild_id,
            registered_by,
            is_active: true,
            channel_type: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Sets the free-form channel type label.
    #[must_use]
    pub fn with_channel_type(mut self, channel_type: impl Into<String>) -> Self {
        let value = channel_type.into();
        let normalized = value.trim();
        self.channel_type = (!normalized.is_empty()).then_some(normalized.to_owned());
        self
    }

    /// Returns the registration identifier.
    #[must_use]
    pub const fn id(&self) -> ChannelId {
        self.id
    }

    /// Returns the project issues from this channel are filed under.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the chat platform's channel identifier.
    #[must_use]
    pub fn platform_channel_id(&self) -> &str {
        &self.platform_channel_id
    }

    /// Returns the chat platform's guild identifier.
    #[must_use]
    pub fn guild_id(&self) -> &str {
        &self.guild_id
    }

    /// Returns the user who registered the channel.
    #[must_use]
    pub const fn registered_by(&self) -> UserId {
        self.registered_by
    }

    /// Returns whether the channel accepts new issue reports.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the channel type label, if any.
    #[must_use]
    pub fn channel_type(&self) -> Option<&str> {
        self.channel_type.as_deref()
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks the channel as inactive.
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.is_active = false;
        self.updated_at = clock.utc();
    }

    /// Marks the channel as active.
    pub fn activate(&mut self, clock: &impl Clock) {
        self.is_active = true;
        self.updated_at = clock.utc();
    }

    /// Moves the registration to another project.
    pub fn reassign(&mut self, project_id: ProjectId, clock: &impl Clock) {
        self.project_id = project_id;
        self.updated_at = clock.utc();
    }
}
