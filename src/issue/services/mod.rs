//! Application services for the issue workflow.

mod assignment;
mod config;
mod locks;
mod notice;
mod status_log;
mod workflow;

pub use assignment::{AssignmentRegistry, AssignmentRegistryError, AssignmentRegistryResult};
pub use config::WorkflowConfig;
pub use locks::{IssueLockGuard, IssueLocks};
pub use notice::{NoticeError, WorkflowNotice};
pub use status_log::{StatusLogError, StatusLogResult, StatusLogService};
pub use workflow::{
    IssueScope, IssueWorkflowService, TransitionIssueRequest, WorkflowError, WorkflowResult,
};
