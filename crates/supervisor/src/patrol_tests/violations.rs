// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::test_helpers::Harness;
use pan_core::{AgentId, Priority, ViolationKind};
use std::time::Duration;

/// An agent that is stale by heartbeat while holding queued work.
fn set_violating(harness: &Harness, id: &str) {
    harness.write_heartbeat(id, Duration::from_secs(6 * 60));
}

fn setup_agent(harness: &Harness, id: &str) {
    harness.add_running_agent(id);
    harness
        .queues()
        .submit(id, harness.item("t1", Priority::Normal, id))
        .unwrap();
}

#[tokio::test]
async fn first_patrol_opens_without_nudging() {
    let harness = Harness::new();
    setup_agent(&harness, "PAN-1");
    set_violating(&harness, "PAN-1");

    let report = harness.sup.patrol().await;
    assert_eq!(report.violations_opened, 1);
    assert_eq!(report.violations_nudged, 0);
    assert!(harness.mux.sent_texts("pan-PAN-1").is_empty());

    let violation = harness
        .violations()
        .open_violation(&AgentId::new("PAN-1"), ViolationKind::HookIdle)
        .unwrap()
        .unwrap();
    assert_eq!(violation.nudge_count, 0);
}

#[tokio::test]
async fn nudges_escalate_across_patrols() {
    let harness = Harness::new();
    setup_agent(&harness, "PAN-1");

    for _ in 0..4 {
        set_violating(&harness, "PAN-1");
        harness.sup.patrol().await;
        harness.clock.advance(Duration::from_secs(30));
    }

    let texts = harness.mux.sent_texts("pan-PAN-1");
    assert_eq!(texts.len(), 3);
    assert!(texts[0].starts_with("Status check"), "{}", texts[0]);
    assert!(texts[1].starts_with("Reminder"), "{}", texts[1]);
    assert!(texts[2].starts_with("Act now"), "{}", texts[2]);
}

#[tokio::test]
async fn nudges_stop_after_max_and_human_is_notified_once() {
    let harness = Harness::new();
    setup_agent(&harness, "PAN-1");

    for _ in 0..6 {
        set_violating(&harness, "PAN-1");
        harness.sup.patrol().await;
        harness.clock.advance(Duration::from_secs(30));
    }

    // 3 nudges maximum, then suppression
    assert_eq!(harness.mux.sent_texts("pan-PAN-1").len(), 3);
    let needs_attention: Vec<_> = harness
        .notify
        .calls()
        .into_iter()
        .filter(|call| call.title.contains("needs attention"))
        .collect();
    assert_eq!(needs_attention.len(), 1);

    let violation = harness
        .violations()
        .open_violation(&AgentId::new("PAN-1"), ViolationKind::HookIdle)
        .unwrap()
        .unwrap();
    assert!(violation.needs_human);
    assert_eq!(violation.nudge_count, 3);
}

#[tokio::test]
async fn recovery_resolves_the_violation() {
    let harness = Harness::new();
    setup_agent(&harness, "PAN-1");
    set_violating(&harness, "PAN-1");
    harness.sup.patrol().await;

    // Agent wakes up: fresh heartbeat
    harness.write_heartbeat("PAN-1", Duration::from_secs(5));
    harness.sup.patrol().await;

    assert!(harness
        .violations()
        .open_violation(&AgentId::new("PAN-1"), ViolationKind::HookIdle)
        .unwrap()
        .is_none());

    let all = harness.violations().load_all().unwrap();
    assert!(all["PAN-1:hook_idle"].resolved);
}

#[tokio::test]
async fn empty_queue_resolves_too() {
    let harness = Harness::new();
    setup_agent(&harness, "PAN-1");
    set_violating(&harness, "PAN-1");
    harness.sup.patrol().await;

    let queues = harness.queues();
    let head = queues.peek_next("PAN-1").unwrap().unwrap();
    queues.complete("PAN-1", &head.id).unwrap();

    set_violating(&harness, "PAN-1");
    harness.sup.patrol().await;

    assert!(harness
        .violations()
        .open_violation(&AgentId::new("PAN-1"), ViolationKind::HookIdle)
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn a_new_violation_can_open_after_resolution() {
    let harness = Harness::new();
    setup_agent(&harness, "PAN-1");
    set_violating(&harness, "PAN-1");
    harness.sup.patrol().await;

    // Recovers...
    harness.write_heartbeat("PAN-1", Duration::from_secs(5));
    harness.sup.patrol().await;

    // ...then goes idle again: a fresh violation with a fresh nudge ladder
    set_violating(&harness, "PAN-1");
    let report = harness.sup.patrol().await;
    assert_eq!(report.violations_opened, 1);

    let violation = harness
        .violations()
        .open_violation(&AgentId::new("PAN-1"), ViolationKind::HookIdle)
        .unwrap()
        .unwrap();
    assert_eq!(violation.nudge_count, 0);
}
