//! Assignment rollback when a composite action cannot commit.

use std::sync::Arc;

use super::helpers::MockAssignments;
use fixtrack::issue::{
    adapters::memory::{InMemoryAssignmentRepository, InMemoryIssueStore},
    domain::{Issue, IssueId, IssueReport, IssueStatus, IssueVersion, Priority, StatusLogEntry},
    ports::{
        AssignmentRepository, AssignmentRepositoryError, IssueRepository, IssueRepositoryError,
        IssueRepositoryResult, PageRequest,
    },
    services::{IssueWorkflowService, WorkflowConfig, WorkflowError},
};
use fixtrack::tenancy::{
    adapters::memory::InMemoryTenancyStore,
    domain::{ChannelId, ProjectId, UserId},
    services::TenancyService,
};
use mockable::DefaultClock;
use rstest::rstest;

type Refusal = fn(&Issue) -> IssueRepositoryError;

/// Issue store that refuses every status commit.
struct RefusingCommits {
    inner: InMemoryIssueStore,
    refusal: Refusal,
}

#[async_trait::async_trait]
impl IssueRepository for RefusingCommits {
    async fn store(&self, issue: &Issue, opening: &StatusLogEntry) -> IssueRepositoryResult<()> {
        self.inner.store(issue, opening).await
    }

    async fn update(
        &self,
        issue: &Issue,
        expected_version: IssueVersion,
    ) -> IssueRepositoryResult<()> {
        self.inner.update(issue, expected_version).await
    }

    async fn commit_transition(
        &self,
        issue: &Issue,
        _expected_version: IssueVersion,
        _entries: &[StatusLogEntry],
    ) -> IssueRepositoryResult<()> {
        Err((self.refusal)(issue))
    }

    async fn find_by_id(&self, id: IssueId) -> IssueRepositoryResult<Option<Issue>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_status(&self, status: IssueStatus) -> IssueRepositoryResult<Vec<Issue>> {
        self.inner.find_by_status(status).await
    }

    async fn find_by_channel(&self, channel_id: ChannelId) -> IssueRepositoryResult<Vec<Issue>> {
        self.inner.find_by_channel(channel_id).await
    }

    async fn find_by_project(&self, project_id: ProjectId) -> IssueRepositoryResult<Vec<Issue>> {
        self.inner.find_by_project(project_id).await
    }

    async fn list(&self, page: PageRequest) -> IssueRepositoryResult<Vec<Issue>> {
        self.inner.list(page).await
    }
}

fn version_conflict(issue: &Issue) -> IssueRepositoryError {
    IssueRepositoryError::ConcurrentModification {
        issue_id: issue.id(),
        expected_version: issue.version(),
        actual_version: IssueVersion::new(99),
    }
}

fn outage(_issue: &Issue) -> IssueRepositoryError {
    IssueRepositoryError::persistence(std::io::Error::other("database unavailable"))
}

struct Stage<A: AssignmentRepository> {
    workflow: IssueWorkflowService<RefusingCommits, A, InMemoryTenancyStore, DefaultClock>,
    issue: Issue,
    developer: UserId,
}

async fn stage<A: AssignmentRepository>(
    assignments: A,
    refusal: Refusal,
    config: WorkflowConfig,
) -> eyre::Result<Stage<A>> {
    let clock = Arc::new(DefaultClock);
    let users = Arc::new(InMemoryTenancyStore::new());
    let tenancy = TenancyService::new(Arc::clone(&users), Arc::clone(&clock));
    let reporter = tenancy.get_or_create_user("customer", Some("Customer")).await?;
    let developer = tenancy.get_or_create_user("dev", Some("Developer")).await?;
    let issues = RefusingCommits {
        inner: InMemoryIssueStore::new(),
        refusal,
    };
    let workflow = IssueWorkflowService::new(Arc::new(issues), Arc::new(assignments), users, clock)
        .with_config(config);
    let report = IssueReport::new(
        ProjectId::new(),
        reporter.id(),
        "Checkout fails",
        "Card declined",
    )?;
    let issue = workflow.report_issue(report).await?;
    Ok(Stage {
        workflow,
        issue,
        developer: developer.id(),
    })
}

/// Assignment store that accepts the new record but cannot delete it.
fn assignments_with_failing_delete() -> MockAssignments {
    let mut mock = MockAssignments::new();
    mock.expect_find_by_triple().returning(|_, _, _| Ok(None));
    mock.expect_create().times(1).returning(|_| Ok(()));
    mock.expect_delete().times(1).returning(|_| {
        Err(AssignmentRepositoryError::persistence(std::io::Error::other(
            "connection reset",
        )))
    });
    mock
}

#[rstest]
#[case::version_conflict(version_conflict, true)]
#[case::outage(outage, false)]
#[tokio::test(flavor = "multi_thread")]
async fn refused_commit_removes_the_new_assignment(
    #[case] refusal: Refusal,
    #[case] retryable: bool,
) -> eyre::Result<()> {
    let stage = stage(
        InMemoryAssignmentRepository::new(),
        refusal,
        WorkflowConfig::default(),
    )
    .await?;

    let err = stage
        .workflow
        .assign_developer(&stage.issue, stage.developer, None)
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("commit should be refused"))?;

    eyre::ensure!(!matches!(err, WorkflowError::RollbackFailed { .. }), "{err}");
    eyre::ensure!(err.is_retryable() == retryable, "{err}");
    let roster = stage.workflow.registry().roster(stage.issue.id()).await?;
    eyre::ensure!(roster.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refused_commit_keeps_assignment_without_compensation() -> eyre::Result<()> {
    let config = WorkflowConfig {
        compensate_failed_assignments: false,
        ..WorkflowConfig::default()
    };
    let stage = stage(InMemoryAssignmentRepository::new(), version_conflict, config).await?;

    let result = stage
        .workflow
        .assign_developer(&stage.issue, stage.developer, None)
        .await;

    eyre::ensure!(matches!(
        result,
        Err(WorkflowError::ConcurrentModification { .. })
    ));
    let roster = stage.workflow.registry().roster(stage.issue.id()).await?;
    eyre::ensure!(roster.len() == 1);
    Ok(())
}

#[rstest]
#[case::version_conflict(version_conflict, true)]
#[case::outage(outage, false)]
#[tokio::test(flavor = "multi_thread")]
async fn failed_rollback_keeps_the_commit_error(
    #[case] refusal: Refusal,
    #[case] retryable: bool,
) -> eyre::Result<()> {
    let stage = stage(
        assignments_with_failing_delete(),
        refusal,
        WorkflowConfig::default(),
    )
    .await?;

    let err = stage
        .workflow
        .assign_developer(&stage.issue, stage.developer, None)
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("commit should be refused"))?;

    let WorkflowError::RollbackFailed { error, rollback } = &err else {
        eyre::bail!("expected a rollback failure, got {err}");
    };
    eyre::ensure!(error.is_retryable() == retryable, "{error}");
    eyre::ensure!(err.is_retryable() == retryable, "{err}");
    eyre::ensure!(rollback.to_string().contains("connection reset"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_copy_never_reaches_the_assignment_store() -> eyre::Result<()> {
    let mut assignments = MockAssignments::new();
    assignments.expect_find_by_triple().never();
    assignments.expect_create().never();
    assignments.expect_delete().never();
    let stage = stage(assignments, version_conflict, WorkflowConfig::default()).await?;
    stage
        .workflow
        .update_priority(&stage.issue, Priority::High)
        .await?;

    let result = stage
        .workflow
        .assign_developer(&stage.issue, stage.developer, None)
        .await;

    eyre::ensure!(matches!(
        result,
        Err(WorkflowError::ConcurrentModification { .. })
    ));
    Ok(())
}
