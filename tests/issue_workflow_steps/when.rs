//! When steps for issue workflow BDD scenarios.

use super::world::{IssueWorkflowWorld, run_async};
use fixtrack::issue::services::TransitionIssueRequest;
use rstest_bdd_macros::when;

#[when("the issue is assigned to the developer")]
fn assign_developer(world: &mut IssueWorkflowWorld) -> Result<(), eyre::Report> {
    let developer = world
        .developer
        .ok_or_else(|| eyre::eyre!("missing developer in scenario world"))?;
    let issue = world.current_issue()?.clone();
    let result = run_async(world.workflow.assign_developer(&issue, developer, None));
    world.record(result.map(|(updated, _)| updated));
    Ok(())
}

#[when("the developer starts work")]
fn start_work(world: &mut IssueWorkflowWorld) -> Result<(), eyre::Report> {
    let issue = world.current_issue()?.clone();
    let result = run_async(world.workflow.start_work(&issue, world.developer));
    world.record(result.map(|(updated, _)| updated));
    Ok(())
}

#[when(r#"the developer resolves the issue with cause "{cause}" and action "{action}""#)]
fn resolve_issue(
    world: &mut IssueWorkflowWorld,
    cause: String,
    action: String,
) -> Result<(), eyre::Report> {
    let issue = world.current_issue()?.clone();
    let result = run_async(
        world
            .workflow
            .resolve(&issue, cause, action, world.developer),
    );
    world.record(result.map(|(updated, _)| updated));
    Ok(())
}

#[when("the issue is assigned to the tester")]
fn assign_tester(world: &mut IssueWorkflowWorld) -> Result<(), eyre::Report> {
    let tester = world
        .tester
        .ok_or_else(|| eyre::eyre!("missing tester in scenario world"))?;
    let issue = world.current_issue()?.clone();
    let result = run_async(world.workflow.assign_qa(&issue, tester, None));
    world.record(result.map(|(updated, _)| updated));
    Ok(())
}

#[when(r#"the tester verifies the fix with notes "{notes}""#)]
fn verify_fix(world: &mut IssueWorkflowWorld, notes: String) -> Result<(), eyre::Report> {
    let issue = world.current_issue()?.clone();
    let result = run_async(world.workflow.verify(&issue, notes, world.tester));
    world.record(result.map(|(updated, _)| updated));
    Ok(())
}

#[when(r#"the tester rejects the fix with reason "{reason}""#)]
fn reject_fix(world: &mut IssueWorkflowWorld, reason: String) -> Result<(), eyre::Report> {
    let issue = world.current_issue()?.clone();
    let result = run_async(world.workflow.reject(&issue, reason, world.tester));
    world.record(result.map(|(updated, _)| updated));
    Ok(())
}

#[when("the issue is closed")]
fn close_issue(world: &mut IssueWorkflowWorld) -> Result<(), eyre::Report> {
    let issue = world.current_issue()?.clone();
    let result = run_async(world.workflow.close(&issue, None));
    world.record(result.map(|(updated, _)| updated));
    Ok(())
}

#[when("the issue is reopened")]
fn reopen_issue(world: &mut IssueWorkflowWorld) -> Result<(), eyre::Report> {
    let issue = world.current_issue()?.clone();
    let result = run_async(world.workflow.reopen(&issue, None));
    world.record(result.map(|(updated, _)| updated));
    Ok(())
}

#[when(r#"the issue is moved to "{status}""#)]
fn move_issue(world: &mut IssueWorkflowWorld, status: String) -> Result<(), eyre::Report> {
    let issue_id = world.current_issue()?.id();
    let result = run_async(
        world
            .workflow
            .transition(TransitionIssueRequest::new(issue_id, status)),
    );
    world.record(result.map(|(updated, _)| updated));
    Ok(())
}
