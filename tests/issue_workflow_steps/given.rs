//! Given steps for issue workflow BDD scenarios.

use super::world::{IssueWorkflowWorld, run_async};
use eyre::WrapErr;
use fixtrack::issue::domain::IssueReport;
use rstest_bdd_macros::given;

#[given(r#"a customer reports an issue titled "{title}""#)]
fn customer_reports_issue(world: &mut IssueWorkflowWorld, title: String) -> Result<(), eyre::Report> {
    let customer = run_async(world.tenancy.create_customer("Acme", None))
        .wrap_err("create customer for workflow scenario")?;
    let project = run_async(world.tenancy.create_project(customer.id(), "Storefront", None))
        .wrap_err("create project for workflow scenario")?;
    let reporter = run_async(world.tenancy.get_or_create_user("customer-1", Some("Casey")))
        .wrap_err("create reporting user")?;

    let report = IssueReport::new(project.id(), reporter.id(), title, "Seen on every attempt")
        .wrap_err("build issue report")?;
    let issue = run_async(world.workflow.report_issue(report)).wrap_err("report issue")?;
    world.issue = Some(issue);
    Ok(())
}

#[given(r#"a developer "{developer}" and a tester "{tester}" are registered"#)]
fn staff_registered(
    world: &mut IssueWorkflowWorld,
    developer: String,
    tester: String,
) -> Result<(), eyre::Report> {
    let dev = run_async(world.tenancy.get_or_create_user(&developer, None))
        .wrap_err("register developer")?;
    let qa = run_async(world.tenancy.get_or_create_user(&tester, None))
        .wrap_err("register tester")?;
    world.developer = Some(dev.id());
    world.tester = Some(qa.id());
    Ok(())
}
