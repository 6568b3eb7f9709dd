//! Shared world state for issue workflow BDD scenarios.

use std::sync::Arc;

use fixtrack::issue::{
    adapters::memory::{InMemoryAssignmentRepository, InMemoryIssueStore},
    domain::Issue,
    services::{IssueWorkflowService, StatusLogService, WorkflowResult},
};
use fixtrack::tenancy::{
    adapters::memory::InMemoryTenancyStore, domain::UserId, services::TenancyService,
};
use mockable::DefaultClock;
use rstest::fixture;

/// Workflow service type used by the BDD world.
pub type TestWorkflow = IssueWorkflowService<
    InMemoryIssueStore,
    InMemoryAssignmentRepository,
    InMemoryTenancyStore,
    DefaultClock,
>;

/// Scenario world for issue workflow behaviour tests.
pub struct IssueWorkflowWorld {
    pub workflow: TestWorkflow,
    pub log: StatusLogService<InMemoryIssueStore, DefaultClock>,
    pub tenancy: TenancyService<InMemoryTenancyStore, DefaultClock>,
    pub developer: Option<UserId>,
    pub tester: Option<UserId>,
    pub issue: Option<Issue>,
    pub last_result: Option<WorkflowResult<Issue>>,
}

impl IssueWorkflowWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(DefaultClock);
        let issues = Arc::new(InMemoryIssueStore::new());
        let tenancy_store = Arc::new(InMemoryTenancyStore::new());
        let workflow = IssueWorkflowService::new(
            Arc::clone(&issues),
            Arc::new(InMemoryAssignmentRepository::new()),
            Arc::clone(&tenancy_store),
            Arc::clone(&clock),
        );

        Self {
            workflow,
            log: StatusLogService::new(issues, Arc::clone(&clock)),
            tenancy: TenancyService::new(tenancy_store, clock),
            developer: None,
            tester: None,
            issue: None,
            last_result: None,
        }
    }

    /// Returns the issue under test.
    pub fn current_issue(&self) -> Result<&Issue, eyre::Report> {
        self.issue
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing reported issue in scenario world"))
    }

    /// Records the outcome of a workflow call, keeping the updated issue.
    pub fn record(&mut self, result: WorkflowResult<Issue>) {
        if let Ok(ref updated) = result {
            self.issue = Some(updated.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for IssueWorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> IssueWorkflowWorld {
    IssueWorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
