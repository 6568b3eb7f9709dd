//! Port contracts for tenant-scoped entities.

pub mod repository;

pub use repository::{
    ChannelRepository, CustomerRepository, ProjectRepository, TenancyRepositoryError,
    TenancyRepositoryResult, UserRepository,
};
