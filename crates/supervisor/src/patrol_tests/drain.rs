// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::launcher::LauncherCall;
use crate::test_helpers::Harness;
use pan_core::{HookState, Priority, SpecialistName};
use std::collections::BTreeMap;
use std::time::Duration;

#[tokio::test]
async fn idle_specialist_is_woken_with_the_head_task() {
    let harness = Harness::new();
    harness.add_specialist_session("review");
    harness.write_heartbeat("review", Duration::from_secs(10));
    harness.write_runtime_state("review", HookState::Idle, Duration::from_secs(10));

    let queues = harness.queues();
    queues
        .submit("review", harness.item("t1", Priority::Normal, "PAN-5"))
        .unwrap();

    let report = harness.sup.patrol().await;
    assert_eq!(report.drained, 1);
    assert!(harness.launcher.calls().contains(&LauncherCall::Wake {
        name: SpecialistName::new("review"),
        item_id: "t1".to_string(),
    }));
    // Head item was completed
    assert!(queues.peek_next("review").unwrap().is_none());
}

#[tokio::test]
async fn priority_order_governs_drain_order() {
    let harness = Harness::new();
    harness.add_specialist_session("review");
    harness.write_heartbeat("review", Duration::from_secs(10));

    let queues = harness.queues();
    queues
        .submit("review", harness.item("A", Priority::Urgent, "PAN-1"))
        .unwrap();
    queues
        .submit("review", harness.item("B", Priority::Normal, "PAN-2"))
        .unwrap();
    queues
        .submit("review", harness.item("C", Priority::High, "PAN-3"))
        .unwrap();

    let mut drained = Vec::new();
    for _ in 0..3 {
        harness.write_runtime_state("review", HookState::Idle, Duration::from_secs(10));
        harness.sup.patrol().await;
        if let Some(LauncherCall::Wake { item_id, .. }) = harness.launcher.calls().last() {
            drained.push(item_id.clone());
        }
    }
    assert_eq!(drained, vec!["A", "C", "B"]);
}

#[tokio::test]
async fn busy_specialist_is_left_alone() {
    let harness = Harness::new();
    harness.add_specialist_session("review");
    harness.write_heartbeat("review", Duration::from_secs(10));
    harness.write_runtime_state("review", HookState::Active, Duration::from_secs(10));

    let queues = harness.queues();
    queues
        .submit("review", harness.item("t1", Priority::Urgent, "PAN-5"))
        .unwrap();

    let report = harness.sup.patrol().await;
    assert_eq!(report.drained, 0);
    assert!(queues.peek_next("review").unwrap().is_some());
}

#[tokio::test]
async fn suspended_specialist_is_resumed_and_item_completed() {
    let mut config = pan_core::SupervisorConfig::default();
    config.ready_timeout = Duration::ZERO;
    let harness = Harness::with_config(config);

    harness.write_heartbeat("review", Duration::from_secs(10));
    harness.write_runtime_state("review", HookState::Suspended, Duration::from_secs(400));
    harness.registry().save_session_id("review", "prov-77").unwrap();

    let queues = harness.queues();
    queues
        .submit("review", harness.item("t1", Priority::Urgent, "PAN-7"))
        .unwrap();

    let report = harness.sup.patrol().await;
    assert_eq!(report.drained, 1);

    // A resume session was created with the saved provider session id
    let session = harness.mux.get_session("pan-review").unwrap();
    assert!(session.cmd.contains("--resume prov-77"), "{}", session.cmd);

    // Item completed; runtime state flipped to active
    assert!(queues.peek_next("review").unwrap().is_none());
    let runtime_state = harness
        .registry()
        .load_runtime_state("review")
        .unwrap()
        .unwrap();
    assert_eq!(runtime_state.state, HookState::Active);
    assert!(runtime_state.resumed_at.is_some());
}

#[tokio::test]
async fn wake_failure_leaves_item_queued() {
    let harness = Harness::new();
    harness.add_specialist_session("review");
    harness.write_heartbeat("review", Duration::from_secs(10));
    harness.write_runtime_state("review", HookState::Idle, Duration::from_secs(10));
    harness.launcher.fail_wakes();

    let queues = harness.queues();
    queues
        .submit("review", harness.item("t1", Priority::Normal, "PAN-5"))
        .unwrap();

    let report = harness.sup.patrol().await;
    assert_eq!(report.drained, 0);
    assert!(queues.peek_next("review").unwrap().is_some());
}

#[tokio::test]
async fn handoff_rows_are_amended_through_the_drain() {
    let harness = Harness::new();
    harness.add_specialist_session("test");
    harness.write_heartbeat("test", Duration::from_secs(10));
    harness.write_runtime_state("test", HookState::Idle, Duration::from_secs(10));

    let handoff_id = harness
        .sup
        .submit_handoff(
            &SpecialistName::new("review"),
            &SpecialistName::new("test"),
            "PAN-9".into(),
            Priority::High,
            BTreeMap::new(),
        )
        .unwrap();

    harness.sup.patrol().await;

    let log = pan_store::HandoffLog::new(&harness.layout);
    let events = log.read_all(None).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, handoff_id);
    assert_eq!(events[0].status, pan_core::HandoffStatus::Processing);
}
