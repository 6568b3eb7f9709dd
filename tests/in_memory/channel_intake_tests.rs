//! Reporting issues through registered chat channels.

use super::helpers::{Workbench, bench};
use fixtrack::issue::{
    domain::{IssueDomainError, IssueReport, IssueSource},
    services::{IssueScope, WorkflowError},
};
use fixtrack::tenancy::services::{RegisterChannelRequest, TenancyError};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn chat_report_is_filed_under_channel_project(bench: Workbench) -> eyre::Result<()> {
    let project = bench.project().await;
    let channel = bench
        .tenancy
        .register_channel(RegisterChannelRequest::new(
            project.id(),
            "9001",
            "guild-1",
            "admin-1",
        ))
        .await?;
    let reporter = bench.user("customer-1").await;

    let active = bench.tenancy.resolve_active_channel("9001").await?;
    let report = IssueReport::from_channel(&active, reporter.id(), "Bot offline", "No answer")?;
    let issue = bench.workflow.report_issue(report).await?;

    eyre::ensure!(issue.project_id() == project.id());
    eyre::ensure!(issue.channel_id() == Some(channel.id()));
    eyre::ensure!(issue.source() == IssueSource::Chat);
    let listed = bench.workflow.list_by_channel(channel.id()).await?;
    eyre::ensure!(listed.len() == 1);

    let prefix: String = issue.id().to_string().chars().take(6).collect();
    let found = bench
        .workflow
        .search_by_partial_id(IssueScope::Channel(channel.id()), &prefix)
        .await?;
    eyre::ensure!(found.iter().any(|candidate| candidate.id() == issue.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deactivated_channel_refuses_reports(bench: Workbench) -> eyre::Result<()> {
    let project = bench.project().await;
    bench
        .tenancy
        .register_channel(RegisterChannelRequest::new(
            project.id(),
            "9002",
            "guild-1",
            "admin-1",
        ))
        .await?;
    let reporter = bench.user("customer-2").await;
    let deactivated = bench.tenancy.deactivate_channel("9002").await?;

    let lookup = bench.tenancy.resolve_active_channel("9002").await;
    let direct = IssueReport::from_channel(&deactivated, reporter.id(), "Title", "Body");

    eyre::ensure!(matches!(lookup, Err(TenancyError::ChannelInactive(_))));
    eyre::ensure!(direct == Err(IssueDomainError::InactiveChannel(deactivated.id())));
    let as_workflow: WorkflowError = IssueDomainError::InactiveChannel(deactivated.id()).into();
    eyre::ensure!(matches!(as_workflow, WorkflowError::ChannelInactive(_)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unregistered_channel_is_reported_as_such(bench: Workbench) {
    let result = bench.tenancy.resolve_active_channel("unknown").await;

    assert!(matches!(
        result,
        Err(TenancyError::ChannelNotRegistered(id)) if id == "unknown"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moved_channel_files_new_reports_under_new_project(bench: Workbench) -> eyre::Result<()> {
    let first = bench.project().await;
    let second = bench.project().await;
    bench
        .tenancy
        .register_channel(RegisterChannelRequest::new(first.id(), "9003", "g", "admin"))
        .await?;
    let reporter = bench.user("customer-3").await;
    let before = {
        let channel = bench.tenancy.resolve_active_channel("9003").await?;
        let report = IssueReport::from_channel(&channel, reporter.id(), "Before", "move")?;
        bench.workflow.report_issue(report).await?
    };

    bench.tenancy.move_channel("9003", second.id()).await?;
    let channel = bench.tenancy.resolve_active_channel("9003").await?;
    let report = IssueReport::from_channel(&channel, reporter.id(), "After", "move")?;
    let after = bench.workflow.report_issue(report).await?;

    eyre::ensure!(before.project_id() == first.id());
    eyre::ensure!(after.project_id() == second.id());
    let kept = bench.workflow.get_issue(before.id()).await?;
    eyre::ensure!(kept.project_id() == first.id());
    Ok(())
}
