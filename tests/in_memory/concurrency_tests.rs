//! Concurrent status changes against shared in-memory stores.

use std::sync::Arc;

use super::helpers::{Workbench, bench};
use fixtrack::issue::{domain::IssueStatus, services::WorkflowError};
use rstest::rstest;

#[rstest]
#[case(2)]
#[case(8)]
#[case(32)]
#[tokio::test(flavor = "multi_thread")]
async fn exactly_one_concurrent_transition_wins(
    bench: Workbench,
    #[case] contenders: usize,
) -> eyre::Result<()> {
    let project = bench.project().await;
    let reporter = bench.user("customer").await;
    let issue = bench.report(&project, reporter.id(), "Contended").await;
    let log_before = bench.issues.log_len()?;
    let workflow = Arc::new(bench.workflow);
    let snapshot = Arc::new(issue);

    // Alternate between both legal targets from open.
    let targets = [IssueStatus::AssignedDev, IssueStatus::Closed];
    let handles: Vec<_> = (0..contenders)
        .map(|n| {
            let target = targets
                .get(n % targets.len())
                .copied()
                .unwrap_or(IssueStatus::Closed);
            let service = Arc::clone(&workflow);
            let copy = Arc::clone(&snapshot);
            tokio::spawn(async move {
                service
                    .request_transition(&copy, target, None)
                    .await
                    .map(|(issue, _)| issue.status())
            })
        })
        .collect();

    let mut winners = Vec::new();
    let mut stale = 0_usize;
    for handle in handles {
        match handle.await? {
            Ok(status) => winners.push(status),
            Err(WorkflowError::ConcurrentModification { .. }) => stale += 1,
            Err(other) => eyre::bail!("unexpected failure: {other}"),
        }
    }

    eyre::ensure!(winners.len() == 1, "winners: {winners:?}");
    eyre::ensure!(stale == contenders - 1);
    let stored = workflow.get_issue(snapshot.id()).await?;
    eyre::ensure!(winners.first() == Some(&stored.status()));
    eyre::ensure!(snapshot.can_transition_to(stored.status()));
    eyre::ensure!(bench.issues.log_len()? == log_before + 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn different_issues_progress_in_parallel(bench: Workbench) -> eyre::Result<()> {
    let project = bench.project().await;
    let reporter = bench.user("customer").await;
    let mut issues = Vec::new();
    for n in 0..16 {
        issues.push(bench.report(&project, reporter.id(), &format!("Issue {n}")).await);
    }
    let workflow = Arc::new(bench.workflow);

    let handles: Vec<_> = issues
        .into_iter()
        .map(|issue| {
            let service = Arc::clone(&workflow);
            tokio::spawn(async move { service.close(&issue, None).await })
        })
        .collect();
    for handle in handles {
        handle.await??;
    }

    let closed = workflow.list_by_status(IssueStatus::Closed).await?;
    eyre::ensure!(closed.len() == 16);
    eyre::ensure!(closed.iter().all(|issue| issue.closed_at().is_some()));
    Ok(())
}
