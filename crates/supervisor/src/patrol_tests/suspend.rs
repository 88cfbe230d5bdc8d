// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::test_helpers::Harness;
use pan_core::{HookState, Priority};
use std::time::Duration;

#[tokio::test]
async fn idle_specialist_suspends_after_five_minutes() {
    let harness = Harness::new();
    harness.add_specialist_session("test");
    harness.write_heartbeat("test", Duration::from_secs(10));
    harness.write_runtime_state("test", HookState::Idle, Duration::from_secs(6 * 60));

    let report = harness.sup.patrol().await;
    assert_eq!(report.suspended, 1);
    assert_eq!(harness.mux.kill_count("pan-test"), 1);

    let runtime_state = harness
        .registry()
        .load_runtime_state("test")
        .unwrap()
        .unwrap();
    assert_eq!(runtime_state.state, HookState::Suspended);
    assert!(runtime_state.suspended_at.is_some());

    // session.id preserved on disk for resume
    assert_eq!(
        harness.registry().load_session_id("test").unwrap().as_deref(),
        Some("prov-test")
    );
}

#[tokio::test]
async fn work_agents_get_the_longer_timeout() {
    let harness = Harness::new();
    harness.add_running_agent("PAN-3");
    harness.write_heartbeat("PAN-3", Duration::from_secs(10));
    // 6 minutes idle: beyond the specialist timeout, inside the agent one
    harness.write_runtime_state("PAN-3", HookState::Idle, Duration::from_secs(6 * 60));

    let report = harness.sup.patrol().await;
    assert_eq!(report.suspended, 0);

    // 11 minutes idle: beyond the 10-minute work-agent timeout
    harness.write_runtime_state("PAN-3", HookState::Idle, Duration::from_secs(11 * 60));
    let report = harness.sup.patrol().await;
    assert_eq!(report.suspended, 1);
    assert_eq!(harness.mux.kill_count("pan-PAN-3"), 1);
}

#[tokio::test]
async fn active_agents_are_never_suspended() {
    let harness = Harness::new();
    harness.add_running_agent("PAN-3");
    harness.write_runtime_state("PAN-3", HookState::Active, Duration::from_secs(60 * 60));

    let report = harness.sup.patrol().await;
    assert_eq!(report.suspended, 0);
    assert_eq!(harness.mux.kill_count("pan-PAN-3"), 0);
}

#[tokio::test]
async fn vanished_session_skips_the_suspend() {
    let harness = Harness::new();
    let record = harness.add_running_agent("PAN-3");
    harness.write_runtime_state("PAN-3", HookState::Idle, Duration::from_secs(20 * 60));
    // Session vanished between observation and action
    harness.mux.drop_session(&record.id.session_name());

    let report = harness.sup.patrol().await;
    assert_eq!(report.suspended, 0);
    assert_eq!(harness.mux.kill_count("pan-PAN-3"), 0);
}

#[tokio::test]
async fn suspend_resume_round_trip_preserves_session_id() {
    let mut config = pan_core::SupervisorConfig::default();
    config.ready_timeout = Duration::ZERO;
    let harness = Harness::with_config(config);

    // Scenario: specialist `test` idle for 6 minutes
    harness.add_specialist_session("test");
    harness.write_heartbeat("test", Duration::from_secs(10));
    harness.write_runtime_state("test", HookState::Idle, Duration::from_secs(6 * 60));

    harness.sup.patrol().await;
    let saved = harness.registry().load_session_id("test").unwrap().unwrap();
    assert_eq!(saved, "prov-test");

    // Immediately queue urgent work; the next patrol resumes and drains it
    let queues = harness.queues();
    queues
        .submit("test", harness.item("t1", Priority::Urgent, "PAN-7"))
        .unwrap();

    let report = harness.sup.patrol().await;
    assert_eq!(report.drained, 1);
    assert!(queues.peek_next("test").unwrap().is_none());

    let runtime_state = harness
        .registry()
        .load_runtime_state("test")
        .unwrap()
        .unwrap();
    assert_eq!(runtime_state.state, HookState::Active);
    // The resumed conversation is the one saved before the suspend
    assert_eq!(runtime_state.session_id.as_deref(), Some(saved.as_str()));
}
