// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::test_helpers::Harness;
use pan_core::{HookState, IssueId, ReviewStatus, ReviewStatusRow, TestStatus};
use std::time::Duration;

fn reviewing_row() -> ReviewStatusRow {
    ReviewStatusRow {
        review_status: Some(ReviewStatus::Reviewing),
        ..Default::default()
    }
}

#[tokio::test]
async fn reviewing_row_is_downgraded_when_reviewer_is_idle() {
    let harness = Harness::new();
    harness
        .review()
        .set_row(IssueId::new("PAN-123"), reviewing_row())
        .unwrap();
    harness.write_runtime_state("review", HookState::Idle, Duration::from_secs(10));

    let report = harness.sup.patrol().await;
    assert_eq!(report.orphans_healed, 1);

    let row = harness.review().row(&IssueId::new("PAN-123")).unwrap().unwrap();
    assert_eq!(row.review_status, Some(ReviewStatus::Pending));
}

#[tokio::test]
async fn reviewing_row_is_kept_while_reviewer_is_active() {
    let harness = Harness::new();
    harness
        .review()
        .set_row(IssueId::new("PAN-123"), reviewing_row())
        .unwrap();
    harness.write_runtime_state("review", HookState::Active, Duration::from_secs(10));

    let report = harness.sup.patrol().await;
    assert_eq!(report.orphans_healed, 0);

    let row = harness.review().row(&IssueId::new("PAN-123")).unwrap().unwrap();
    assert_eq!(row.review_status, Some(ReviewStatus::Reviewing));
}

#[tokio::test]
async fn testing_row_follows_the_test_specialist() {
    let harness = Harness::new();
    harness
        .review()
        .set_row(
            IssueId::new("PAN-5"),
            ReviewStatusRow {
                test_status: Some(TestStatus::Testing),
                ..Default::default()
            },
        )
        .unwrap();
    // No runtime state for `test` at all: not active

    harness.sup.patrol().await;

    let row = harness.review().row(&IssueId::new("PAN-5")).unwrap().unwrap();
    assert_eq!(row.test_status, Some(TestStatus::Pending));
}

#[tokio::test]
async fn healing_is_idempotent_and_skips_rewrites() {
    let harness = Harness::new();
    harness
        .review()
        .set_row(IssueId::new("PAN-123"), reviewing_row())
        .unwrap();

    let report = harness.sup.patrol().await;
    assert_eq!(report.orphans_healed, 1);

    let path = harness.layout.review_status();
    let mtime_after_heal = std::fs::metadata(&path).unwrap().modified().unwrap();
    let bytes_after_heal = std::fs::read(&path).unwrap();

    // Second patrol with no change: the file is untouched
    let report = harness.sup.patrol().await;
    assert_eq!(report.orphans_healed, 0);
    assert_eq!(std::fs::read(&path).unwrap(), bytes_after_heal);
    assert_eq!(
        std::fs::metadata(&path).unwrap().modified().unwrap(),
        mtime_after_heal
    );
}

#[tokio::test]
async fn terminal_statuses_are_never_touched() {
    let harness = Harness::new();
    harness
        .review()
        .set_row(
            IssueId::new("PAN-1"),
            ReviewStatusRow {
                review_status: Some(ReviewStatus::Passed),
                test_status: Some(TestStatus::Failed),
                ..Default::default()
            },
        )
        .unwrap();

    let report = harness.sup.patrol().await;
    assert_eq!(report.orphans_healed, 0);

    let row = harness.review().row(&IssueId::new("PAN-1")).unwrap().unwrap();
    assert_eq!(row.review_status, Some(ReviewStatus::Passed));
    assert_eq!(row.test_status, Some(TestStatus::Failed));
}
