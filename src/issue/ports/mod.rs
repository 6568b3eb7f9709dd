//! Port contracts for the issue workflow.
//!
//! Ports define the storage seams the workflow services depend on. Every
//! trait is object-safe and `Send + Sync` so services can share adapters
//! across concurrently running requests.

pub mod assignment;
pub mod issue;
pub mod status_log;
pub mod user_directory;

pub use assignment::{AssignmentRepository, AssignmentRepositoryError, AssignmentRepositoryResult};
pub use issue::{IssueRepository, IssueRepositoryError, IssueRepositoryResult, PageRequest};
pub use status_log::{StatusLogRepository, StatusLogRepositoryError, StatusLogRepositoryResult};
pub use user_directory::{UserDirectory, UserDirectoryError, UserDirectoryResult};
