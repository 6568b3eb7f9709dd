//! Property tests: random walks over the transition table.

use super::helpers::bench;
use fixtrack::issue::domain::IssueStatus;
use proptest::prelude::*;
use proptest::sample::Index;

/// Drives the workflow along `steps`, choosing each next status from the
/// allowed successors, and checks the invariants after every change.
fn walk(steps: &[Index]) -> Result<(), TestCaseError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    runtime.block_on(async {
        let bench = bench();
        let project = bench.project().await;
        let reporter = bench.user("walker").await;
        let mut issue = bench.report(&project, reporter.id(), "Random walk").await;
        let mut visited = vec![issue.status()];

        for step in steps {
            let target = *step.get(issue.next_statuses());
            let (moved, entry) = bench
                .workflow
                .request_transition(&issue, target, Some(reporter.id()))
                .await
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            prop_assert_eq!(entry.old_status(), Some(issue.status()));
            prop_assert_eq!(moved.status(), target);
            prop_assert_eq!(
                moved.closed_at().is_some(),
                moved.status() == IssueStatus::Closed
            );
            visited.push(target);
            issue = moved;
        }

        let replayed = bench
            .log
            .replay(issue.id())
            .await
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(replayed, visited);
        Ok::<(), TestCaseError>(())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every reachable status keeps `closed_at` consistent and the log
    /// replays to the statuses actually visited.
    #[test]
    fn random_walk_keeps_invariants(steps in prop::collection::vec(any::<Index>(), 1..40)) {
        walk(&steps)?;
    }
}
