//! Best-effort assignment cleanup when individual deletes fail.

use std::sync::{Arc, Mutex};

use super::helpers::MockAssignments;
use fixtrack::issue::{
    domain::{AssigneeRole, AssignmentId, IssueAssignment, IssueId},
    ports::AssignmentRepositoryError,
    services::AssignmentRegistry,
};
use fixtrack::tenancy::{adapters::memory::InMemoryTenancyStore, domain::UserId};
use mockable::DefaultClock;
use rstest::rstest;

type Records = Arc<Mutex<Vec<IssueAssignment>>>;

/// Builds a mock whose deletes act on `records`, failing for `broken`.
fn mock_with_failing_delete(records: &Records, broken: AssignmentId) -> MockAssignments {
    let mut mock = MockAssignments::new();
    let listed = Arc::clone(records);
    mock.expect_list_for_issue().returning(move |issue_id| {
        let held = listed.lock().expect("records lock");
        Ok(held
            .iter()
            .filter(|assignment| assignment.issue_id() == issue_id)
            .cloned()
            .collect())
    });
    let deleted = Arc::clone(records);
    mock.expect_delete().times(3).returning(move |id| {
        if id == broken {
            return Err(AssignmentRepositoryError::persistence(
                std::io::Error::other("connection reset"),
            ));
        }
        deleted
            .lock()
            .expect("records lock")
            .retain(|assignment| assignment.id() != id);
        Ok(())
    });
    mock
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unassign_all_continues_past_a_failed_delete() {
    let clock = DefaultClock;
    let issue_id = IssueId::new();
    let seeded: Vec<IssueAssignment> = [AssigneeRole::Dev, AssigneeRole::Qa, AssigneeRole::Reviewer]
        .into_iter()
        .map(|role| IssueAssignment::new(issue_id, UserId::new(), role, &clock))
        .collect();
    let broken = seeded.get(1).expect("three seeded assignments").id();
    let records: Records = Arc::new(Mutex::new(seeded));
    let registry = AssignmentRegistry::new(
        Arc::new(mock_with_failing_delete(&records, broken)),
        Arc::new(InMemoryTenancyStore::new()),
        Arc::new(clock),
    );

    let removed = registry
        .unassign_all(issue_id)
        .await
        .expect("partial failures are not raised");
    let remaining = registry
        .list_for_issue(issue_id)
        .await
        .expect("listing should succeed");

    assert_eq!(removed, 2);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining.first().map(IssueAssignment::id), Some(broken));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unassign_all_fails_when_listing_fails() {
    let mut mock = MockAssignments::new();
    mock.expect_list_for_issue().returning(|_| {
        Err(AssignmentRepositoryError::persistence(std::io::Error::other(
            "database unavailable",
        )))
    });
    mock.expect_delete().never();
    let registry = AssignmentRegistry::new(
        Arc::new(mock),
        Arc::new(InMemoryTenancyStore::new()),
        Arc::new(DefaultClock),
    );

    let result = registry.unassign_all(IssueId::new()).await;

    assert!(result.is_err());
}
