//! Composite assignment actions racing on one issue.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use fixtrack::issue::{
    adapters::memory::{InMemoryAssignmentRepository, InMemoryIssueStore},
    domain::{
        AssigneeRole, AssignmentId, Issue, IssueAssignment, IssueId, IssueReport, IssueStatus,
        StatusLogEntry,
    },
    ports::{AssignmentRepository, AssignmentRepositoryResult},
    services::{IssueWorkflowService, WorkflowError, WorkflowResult},
};
use fixtrack::tenancy::{
    adapters::memory::InMemoryTenancyStore,
    domain::{ProjectId, UserId},
    services::TenancyService,
};
use mockable::DefaultClock;
use rstest::rstest;
use tokio::task::JoinHandle;

/// Assignment store whose first insert stalls after it has landed.
#[derive(Default)]
struct SlowFirstCreate {
    inner: InMemoryAssignmentRepository,
    stalled: AtomicBool,
}

#[async_trait::async_trait]
impl AssignmentRepository for SlowFirstCreate {
    async fn create(&self, assignment: &IssueAssignment) -> AssignmentRepositoryResult<()> {
        self.inner.create(assignment).await?;
        if !self.stalled.swap(true, Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        Ok(())
    }

    async fn delete(&self, id: AssignmentId) -> AssignmentRepositoryResult<()> {
        self.inner.delete(id).await
    }

    async fn delete_all_for_issue(&self, issue_id: IssueId) -> AssignmentRepositoryResult<usize> {
        self.inner.delete_all_for_issue(issue_id).await
    }

    async fn find_by_triple(
        &self,
        issue_id: IssueId,
        user_id: UserId,
        role: AssigneeRole,
    ) -> AssignmentRepositoryResult<Option<IssueAssignment>> {
        self.inner.find_by_triple(issue_id, user_id, role).await
    }

    async fn list_for_issue(
        &self,
        issue_id: IssueId,
    ) -> AssignmentRepositoryResult<Vec<IssueAssignment>> {
        self.inner.list_for_issue(issue_id).await
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> AssignmentRepositoryResult<Vec<IssueAssignment>> {
        self.inner.list_for_user(user_id).await
    }

    async fn list_for_issue_and_role(
        &self,
        issue_id: IssueId,
        role: AssigneeRole,
    ) -> AssignmentRepositoryResult<Vec<IssueAssignment>> {
        self.inner.list_for_issue_and_role(issue_id, role).await
    }
}

type RaceWorkflow =
    IssueWorkflowService<InMemoryIssueStore, SlowFirstCreate, InMemoryTenancyStore, DefaultClock>;

fn spawn_assign(
    workflow: &Arc<RaceWorkflow>,
    issue: &Arc<Issue>,
    developer: UserId,
) -> JoinHandle<WorkflowResult<(Issue, StatusLogEntry)>> {
    let service = Arc::clone(workflow);
    let copy = Arc::clone(issue);
    tokio::spawn(async move { service.assign_developer(&copy, developer, None).await })
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn racing_assignments_leave_the_winner_assigned() -> eyre::Result<()> {
    let clock = Arc::new(DefaultClock);
    let users = Arc::new(InMemoryTenancyStore::new());
    let tenancy = TenancyService::new(Arc::clone(&users), Arc::clone(&clock));
    let reporter = tenancy.get_or_create_user("customer", Some("Customer")).await?;
    let developer = tenancy.get_or_create_user("dev", Some("Developer")).await?;
    let workflow = Arc::new(IssueWorkflowService::new(
        Arc::new(InMemoryIssueStore::new()),
        Arc::new(SlowFirstCreate::default()),
        users,
        clock,
    ));
    let report = IssueReport::new(ProjectId::new(), reporter.id(), "Refund stuck", "Pending")?;
    let issue = Arc::new(workflow.report_issue(report).await?);

    // The first caller stalls inside the insert while the second arrives.
    let first = spawn_assign(&workflow, &issue, developer.id());
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = spawn_assign(&workflow, &issue, developer.id());
    let outcomes = [first.await?, second.await?];

    let stored = workflow.get_issue(issue.id()).await?;
    let developers = workflow
        .registry()
        .list_for_issue_and_role(issue.id(), AssigneeRole::Dev)
        .await?;
    eyre::ensure!(stored.status() == IssueStatus::AssignedDev);
    eyre::ensure!(developers.len() == 1, "developers: {developers:?}");
    eyre::ensure!(outcomes.iter().filter(|outcome| outcome.is_ok()).count() == 1);
    eyre::ensure!(
        outcomes
            .iter()
            .filter_map(|outcome| outcome.as_ref().err())
            .all(WorkflowError::is_retryable)
    );
    Ok(())
}
