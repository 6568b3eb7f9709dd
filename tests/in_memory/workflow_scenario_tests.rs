//! End-to-end workflow scenarios over in-memory stores.

use super::helpers::{Workbench, bench};
use fixtrack::issue::{
    domain::{AssigneeRole, IssueStatus},
    services::WorkflowError,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn issue_travels_from_report_to_close(bench: Workbench) -> eyre::Result<()> {
    let project = bench.project().await;
    let reporter = bench.user("customer-1").await;
    let dev = bench.user("dev-1").await;
    let qa = bench.user("qa-1").await;
    let issue = bench.report(&project, reporter.id(), "Orders vanish").await;
    eyre::ensure!(issue.status() == IssueStatus::Open);

    let (assigned, _) = bench
        .workflow
        .assign_developer(&issue, dev.id(), Some(dev.id()))
        .await?;
    eyre::ensure!(assigned.status() == IssueStatus::AssignedDev);
    let developers = bench
        .workflow
        .registry()
        .list_for_issue_and_role(issue.id(), AssigneeRole::Dev)
        .await?;
    eyre::ensure!(developers.len() == 1);
    eyre::ensure!(developers.first().map(|a| a.user_id()) == Some(dev.id()));

    let (started, _) = bench.workflow.start_work(&assigned, Some(dev.id())).await?;
    let (resolved, _) = bench
        .workflow
        .resolve(&started, "race condition", "added mutex", Some(dev.id()))
        .await?;
    eyre::ensure!(resolved.resolution().cause.as_deref() == Some("race condition"));
    eyre::ensure!(resolved.resolution().action.as_deref() == Some("added mutex"));

    let (testing, _) = bench.workflow.assign_qa(&resolved, qa.id(), Some(qa.id())).await?;
    let (verified, _) = bench.workflow.verify(&testing, "", Some(qa.id())).await?;
    let (closed, _) = bench.workflow.close(&verified, Some(qa.id())).await?;
    eyre::ensure!(closed.status() == IssueStatus::Closed);
    eyre::ensure!(closed.closed_at().is_some());

    // The opening entry precedes the six hand-offs.
    let timeline = bench.log.timeline(issue.id()).await?;
    let transitions: Vec<_> = timeline
        .iter()
        .skip(1)
        .map(|entry| entry.new_status())
        .collect();
    eyre::ensure!(timeline.len() == 7);
    eyre::ensure!(
        transitions
            == vec![
                IssueStatus::AssignedDev,
                IssueStatus::InProgress,
                IssueStatus::Resolved,
                IssueStatus::AssignedQa,
                IssueStatus::Verified,
                IssueStatus::Closed,
            ]
    );
    let replayed = bench.log.replay(issue.id()).await?;
    eyre::ensure!(replayed.last() == Some(&IssueStatus::Closed));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_fix_cannot_jump_back_to_resolved(bench: Workbench) -> eyre::Result<()> {
    let project = bench.project().await;
    let reporter = bench.user("customer-2").await;
    let dev = bench.user("dev-2").await;
    let qa = bench.user("qa-2").await;
    let issue = bench.report(&project, reporter.id(), "Wrong totals").await;
    let (assigned, _) = bench.workflow.assign_developer(&issue, dev.id(), None).await?;
    let (started, _) = bench.workflow.start_work(&assigned, None).await?;
    let (resolved, _) = bench
        .workflow
        .resolve(&started, "rounding", "use decimals", None)
        .await?;
    let (testing, _) = bench.workflow.assign_qa(&resolved, qa.id(), None).await?;
    let (verified, _) = bench.workflow.verify(&testing, "looks fine", None).await?;

    let (rejected, entry) = bench
        .workflow
        .reject(&verified, "regression found", Some(qa.id()))
        .await?;
    eyre::ensure!(rejected.status() == IssueStatus::Rejected);
    eyre::ensure!(entry.note() == Some("regression found"));

    let result = bench
        .workflow
        .request_transition(&rejected, IssueStatus::Resolved, Some(qa.id()))
        .await;
    eyre::ensure!(matches!(
        result,
        Err(WorkflowError::InvalidTransition {
            from: IssueStatus::Rejected,
            to: IssueStatus::Resolved,
            ..
        })
    ));
    eyre::ensure!(
        rejected.next_statuses()
            == [
                IssueStatus::AssignedDev,
                IssueStatus::InProgress,
                IssueStatus::Open
            ]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_issue_reopens_and_is_worked_again(bench: Workbench) -> eyre::Result<()> {
    let project = bench.project().await;
    let reporter = bench.user("customer-3").await;
    let dev = bench.user("dev-3").await;
    let issue = bench.report(&project, reporter.id(), "Logout loop").await;
    let (closed, _) = bench.workflow.close(&issue, Some(reporter.id())).await?;

    let (reopened, entries) = bench.workflow.reopen(&closed, Some(reporter.id())).await?;
    eyre::ensure!(entries.len() == 2);
    eyre::ensure!(reopened.closed_at().is_none());

    let (assigned, _) = bench.workflow.assign_developer(&reopened, dev.id(), None).await?;
    eyre::ensure!(assigned.status() == IssueStatus::AssignedDev);

    let replayed = bench.log.replay(issue.id()).await?;
    eyre::ensure!(
        replayed
            == vec![
                IssueStatus::Open,
                IssueStatus::Closed,
                IssueStatus::Reopened,
                IssueStatus::Open,
                IssueStatus::AssignedDev,
            ]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn idempotent_assignment_through_registry(bench: Workbench) -> eyre::Result<()> {
    let project = bench.project().await;
    let reporter = bench.user("customer-4").await;
    let dev = bench.user("dev-4").await;
    let issue = bench.report(&project, reporter.id(), "Slow search").await;
    let registry = bench.workflow.registry();

    let first = registry.assign(issue.id(), dev.id(), AssigneeRole::Dev).await?;
    let second = registry.assign(issue.id(), dev.id(), AssigneeRole::Dev).await?;

    eyre::ensure!(first.id() == second.id());
    let developers = registry
        .list_for_issue_and_role(issue.id(), AssigneeRole::Dev)
        .await?;
    eyre::ensure!(developers.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recent_activity_spans_issues(bench: Workbench) -> eyre::Result<()> {
    let project = bench.project().await;
    let reporter = bench.user("customer-5").await;
    let first = bench.report(&project, reporter.id(), "First").await;
    let second = bench.report(&project, reporter.id(), "Second").await;
    bench.workflow.close(&first, None).await?;

    let recent = bench.log.recent(2).await?;

    let touched: Vec<_> = recent.iter().map(|entry| entry.issue_id()).collect();
    eyre::ensure!(touched == vec![first.id(), second.id()]);
    Ok(())
}
