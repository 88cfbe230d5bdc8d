// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end patrol tests against fake adapters and a fake clock.

mod drain;
mod health;
mod lazy;
mod mass_death;
mod orphans;
mod suspend;
mod violations;

use crate::test_helpers::Harness;

#[tokio::test]
async fn empty_world_patrol_is_quiet() {
    let harness = Harness::new();
    let report = harness.sup.patrol().await;

    assert!(!report.skipped);
    assert_eq!(report.cycle, 1);
    assert_eq!(report.force_kills, 0);
    assert_eq!(report.drained, 0);
    assert_eq!(report.suspended, 0);
    assert!(report.phase_errors.is_empty());
    // Four dead specialists get restart attempts
    assert_eq!(report.specialists_checked, 4);
    assert_eq!(report.restarts, 4);
}

#[tokio::test]
async fn patrol_cycle_counts_up_and_persists() {
    let harness = Harness::new();
    harness.sup.patrol().await;
    let report = harness.sup.patrol().await;
    assert_eq!(report.cycle, 2);

    let persisted = pan_store::SupervisorStateStore::new(harness.layout.clone()).load();
    assert_eq!(persisted.patrol_cycle, 2);
}

#[tokio::test]
async fn phase_failures_do_not_abort_the_patrol() {
    let harness = Harness::new();
    // Corrupt review file makes the orphan phase fail
    std::fs::write(harness.layout.review_status(), "{bad").unwrap();

    let report = harness.sup.patrol().await;
    assert!(report
        .phase_errors
        .iter()
        .any(|error| error.starts_with("orphans:")));
    // Later phases still ran: patrol completed and persisted state
    let persisted = pan_store::SupervisorStateStore::new(harness.layout.clone()).load();
    assert_eq!(persisted.patrol_cycle, 1);
}
