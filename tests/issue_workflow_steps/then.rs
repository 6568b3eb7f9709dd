//! Then steps for issue workflow BDD scenarios.

use super::world::{IssueWorkflowWorld, run_async};
use eyre::WrapErr;
use fixtrack::issue::{domain::IssueStatus, services::WorkflowError};
use rstest_bdd_macros::then;

#[then(r#"the issue status is "{status}""#)]
fn issue_status_is(world: &IssueWorkflowWorld, status: String) -> Result<(), eyre::Report> {
    let expected = IssueStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let issue_id = world.current_issue()?.id();
    let stored = run_async(world.workflow.get_issue(issue_id)).wrap_err("reload issue")?;

    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            stored.status().as_str()
        ));
    }

    Ok(())
}

#[then("the issue has a closing timestamp")]
fn issue_has_closing_timestamp(world: &IssueWorkflowWorld) -> Result<(), eyre::Report> {
    if world.current_issue()?.closed_at().is_none() {
        return Err(eyre::eyre!("expected closed_at to be set"));
    }
    Ok(())
}

#[then("the issue has no closing timestamp")]
fn issue_has_no_closing_timestamp(world: &IssueWorkflowWorld) -> Result<(), eyre::Report> {
    if let Some(closed_at) = world.current_issue()?.closed_at() {
        return Err(eyre::eyre!("expected closed_at to be cleared, found {closed_at}"));
    }
    Ok(())
}

#[then(r#"the status log replays "{statuses}""#)]
fn status_log_replays(world: &IssueWorkflowWorld, statuses: String) -> Result<(), eyre::Report> {
    let expected = statuses
        .split(',')
        .map(IssueStatus::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| eyre::eyre!("invalid expected status list in scenario: {err}"))?;
    let issue_id = world.current_issue()?.id();
    let replayed = run_async(world.log.replay(issue_id)).wrap_err("replay status log")?;

    if replayed != expected {
        return Err(eyre::eyre!(
            "expected replay {expected:?}, found {replayed:?}"
        ));
    }

    Ok(())
}

#[then("the request fails with an invalid transition error")]
fn request_fails_with_invalid_transition(world: &IssueWorkflowWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing workflow result"))?;

    if !matches!(result, Err(WorkflowError::InvalidTransition { .. })) {
        return Err(eyre::eyre!(
            "expected InvalidTransition error, got {result:?}"
        ));
    }

    Ok(())
}

#[then("the request fails with an invalid status error")]
fn request_fails_with_invalid_status(world: &IssueWorkflowWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing workflow result"))?;

    if !matches!(result, Err(WorkflowError::InvalidStatus(_))) {
        return Err(eyre::eyre!("expected InvalidStatus error, got {result:?}"));
    }

    Ok(())
}
