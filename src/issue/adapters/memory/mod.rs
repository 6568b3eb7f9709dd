//! In-memory adapter implementations for the issue workflow.

mod assignment;
mod issue;

pub use assignment::InMemoryAssignmentRepository;
pub use issue::InMemoryIssueStore;
