//! Shared test helpers for in-memory workflow integration tests.

use std::sync::Arc;

use fixtrack::issue::{
    adapters::memory::{InMemoryAssignmentRepository, InMemoryIssueStore},
    domain::{AssigneeRole, AssignmentId, Issue, IssueAssignment, IssueId, IssueReport},
    ports::{AssignmentRepository, AssignmentRepositoryResult},
    services::{IssueWorkflowService, StatusLogService},
};
use fixtrack::tenancy::{
    adapters::memory::InMemoryTenancyStore,
    domain::{Project, User, UserId},
    services::TenancyService,
};
use mockable::DefaultClock;
use mockall::mock;
use rstest::fixture;

mock! {
    /// Assignment repository with scripted responses.
    pub Assignments {}

    #[async_trait::async_trait]
    impl AssignmentRepository for Assignments {
        async fn create(&self, assignment: &IssueAssignment) -> AssignmentRepositoryResult<()>;
        async fn delete(&self, id: AssignmentId) -> AssignmentRepositoryResult<()>;
        async fn delete_all_for_issue(&self, issue_id: IssueId) -> AssignmentRepositoryResult<usize>;
        async fn find_by_triple(
            &self,
            issue_id: IssueId,
            user_id: UserId,
            role: AssigneeRole,
        ) -> AssignmentRepositoryResult<Option<IssueAssignment>>;
        async fn list_for_issue(
            &self,
            issue_id: IssueId,
        ) -> AssignmentRepositoryResult<Vec<IssueAssignment>>;
        async fn list_for_user(
            &self,
            user_id: UserId,
        ) -> AssignmentRepositoryResult<Vec<IssueAssignment>>;
        async fn list_for_issue_and_role(
            &self,
            issue_id: IssueId,
            role: AssigneeRole,
        ) -> AssignmentRepositoryResult<Vec<IssueAssignment>>;
    }
}

/// Workflow service over in-memory stores.
pub type Workflow = IssueWorkflowService<
    InMemoryIssueStore,
    InMemoryAssignmentRepository,
    InMemoryTenancyStore,
    DefaultClock,
>;

/// Services wired over one set of shared in-memory stores.
pub struct Workbench {
    /// Issue workflow service.
    pub workflow: Workflow,
    /// Status log reader.
    pub log: StatusLogService<InMemoryIssueStore, DefaultClock>,
    /// Tenancy registration service.
    pub tenancy: TenancyService<InMemoryTenancyStore, DefaultClock>,
    /// Issue and log store shared by the services.
    pub issues: Arc<InMemoryIssueStore>,
}

impl Workbench {
    /// Creates a customer and a project under it.
    ///
    /// # Panics
    ///
    /// Panics if either record cannot be created.
    pub async fn project(&self) -> Project {
        let customer = self
            .tenancy
            .create_customer("Acme", None)
            .await
            .expect("customer should be created");
        self.tenancy
            .create_project(customer.id(), "Storefront", None)
            .await
            .expect("project should be created")
    }

    /// Returns the user for a platform identifier, creating it if needed.
    ///
    /// # Panics
    ///
    /// Panics if the user cannot be created.
    pub async fn user(&self, platform_id: &str) -> User {
        self.tenancy
            .get_or_create_user(platform_id, Some(platform_id))
            .await
            .expect("user should be created")
    }

    /// Reports a web issue under `project`.
    ///
    /// # Panics
    ///
    /// Panics if the report is refused.
    pub async fn report(&self, project: &Project, reporter: UserId, title: &str) -> Issue {
        let report = IssueReport::new(project.id(), reporter, title, "Observed in production")
            .expect("report should be valid");
        self.workflow
            .report_issue(report)
            .await
            .expect("issue should be reported")
    }
}

/// Provides a fresh set of services for each test.
#[fixture]
pub fn bench() -> Workbench {
    let clock = Arc::new(DefaultClock);
    let issues = Arc::new(InMemoryIssueStore::new());
    let tenancy_store = Arc::new(InMemoryTenancyStore::new());
    let workflow = IssueWorkflowService::new(
        Arc::clone(&issues),
        Arc::new(InMemoryAssignmentRepository::new()),
        Arc::clone(&tenancy_store),
        Arc::clone(&clock),
    );
    Workbench {
        workflow,
        log: StatusLogService::new(Arc::clone(&issues), Arc::clone(&clock)),
        tenancy: TenancyService::new(tenancy_store, clock),
        issues,
    }
}
