// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::lazy::ANTI_LAZY_MESSAGE;
use crate::test_helpers::Harness;
use pan_core::{IssueId, MergeStatus, ReviewStatusRow};
use std::time::Duration;

fn lazy_scrollback() -> Vec<String> {
    vec![
        "I've implemented the first half.".to_string(),
        "What would you like me to do next?".to_string(),
    ]
}

fn set_lazy_session(harness: &Harness, agent: &str) {
    let session = format!("pan-{}", agent);
    harness.mux.set_scrollback(&session, lazy_scrollback());
}

#[tokio::test]
async fn lazy_agent_gets_the_fixed_nudge_and_enter() {
    let harness = Harness::new();
    harness.add_running_agent("PAN-1");
    set_lazy_session(&harness, "PAN-1");

    let report = harness.sup.patrol().await;
    assert_eq!(report.lazy_nudges, 1);
    assert_eq!(
        harness.mux.sent_texts("pan-PAN-1"),
        vec![ANTI_LAZY_MESSAGE.to_string()]
    );
    let calls = harness.mux.calls();
    let enter_after_text = calls.windows(2).any(|pair| {
        matches!(
            (&pair[0], &pair[1]),
            (
                pan_adapters::MuxCall::SendText { id: a, .. },
                pan_adapters::MuxCall::SendEnter { id: b }
            ) if a == "pan-PAN-1" && b == "pan-PAN-1"
        )
    });
    assert!(enter_after_text);
}

#[tokio::test]
async fn busy_scrollback_is_not_nudged() {
    let harness = Harness::new();
    harness.add_running_agent("PAN-1");
    harness.mux.set_scrollback(
        "pan-PAN-1",
        vec!["Compiling...".to_string(), "tests running".to_string()],
    );

    let report = harness.sup.patrol().await;
    assert_eq!(report.lazy_nudges, 0);
    assert!(harness.mux.sent_texts("pan-PAN-1").is_empty());
}

#[tokio::test]
async fn nudges_are_debounced_per_agent() {
    let harness = Harness::new();
    harness.add_running_agent("PAN-1");
    set_lazy_session(&harness, "PAN-1");

    let report = harness.sup.patrol().await;
    assert_eq!(report.lazy_nudges, 1);

    // Scrollback still lazy on the next patrols, inside the 5-minute cooldown
    for _ in 0..3 {
        harness.clock.advance(Duration::from_secs(60));
        let report = harness.sup.patrol().await;
        assert_eq!(report.lazy_nudges, 0);
    }
    assert_eq!(harness.mux.sent_texts("pan-PAN-1").len(), 1);

    // Past the cooldown a second nudge goes out
    harness.clock.advance(Duration::from_secs(2 * 60));
    let report = harness.sup.patrol().await;
    assert_eq!(report.lazy_nudges, 1);
    assert_eq!(harness.mux.sent_texts("pan-PAN-1").len(), 2);
}

#[tokio::test]
async fn cooldowns_are_independent_across_agents() {
    let harness = Harness::new();
    harness.add_running_agent("PAN-1");
    harness.add_running_agent("PAN-2");
    set_lazy_session(&harness, "PAN-1");

    harness.sup.patrol().await;
    assert_eq!(harness.mux.sent_texts("pan-PAN-1").len(), 1);
    assert!(harness.mux.sent_texts("pan-PAN-2").is_empty());

    // PAN-2 turns lazy while PAN-1 cools down
    set_lazy_session(&harness, "PAN-2");
    harness.clock.advance(Duration::from_secs(30));
    let report = harness.sup.patrol().await;
    assert_eq!(report.lazy_nudges, 1);
    assert_eq!(harness.mux.sent_texts("pan-PAN-2").len(), 1);
    assert_eq!(harness.mux.sent_texts("pan-PAN-1").len(), 1);
}

#[tokio::test]
async fn agents_in_the_review_pipeline_are_skipped() {
    let harness = Harness::new();
    harness.add_running_agent("PAN-1");
    set_lazy_session(&harness, "PAN-1");
    harness
        .review()
        .set_row(
            IssueId::new("PAN-1"),
            ReviewStatusRow {
                merge_status: Some(MergeStatus::Merging),
                ..Default::default()
            },
        )
        .unwrap();

    let report = harness.sup.patrol().await;
    assert_eq!(report.lazy_nudges, 0);
    assert!(harness.mux.sent_texts("pan-PAN-1").is_empty());
}

#[tokio::test]
async fn dead_session_is_skipped() {
    let harness = Harness::new();
    let record = harness.add_running_agent("PAN-1");
    set_lazy_session(&harness, "PAN-1");
    harness.mux.drop_session(&record.id.session_name());

    let report = harness.sup.patrol().await;
    assert_eq!(report.lazy_nudges, 0);
}
