//! `PostgreSQL` adapters for the issue workflow.
//!
//! Status changes update the `issues` row under a version check and insert
//! their `issue_status_logs` rows in the same transaction.

mod assignment;
mod conversion;
mod issue;
mod models;
mod pool;
mod schema;
mod status_log;
mod users;

pub use assignment::PostgresAssignmentRepository;
pub use issue::PostgresIssueRepository;
pub use pool::WorkflowPgPool;
pub use status_log::PostgresStatusLogRepository;
pub use users::PostgresUserDirectory;
