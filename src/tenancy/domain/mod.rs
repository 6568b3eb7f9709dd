//! Domain model for tenant-scoped entities.
//!
//! These entities exist so the issue workflow has projects to file issues
//! under, channels to report from, and users to act and be assigned.

mod channel;
mod customer;
mod error;
mod ids;
mod project;
mod user;

pub use channel::{Channel, PlatformChannel};
pub use customer::Customer;
pub use error::TenancyDomainError;
pub use ids::{ChannelId, CustomerId, ProjectId, UserId};
pub use project::Project;
pub use user::{PersistedUserData, User, UserRole};
