// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::test_helpers::Harness;
use pan_core::SpecialistName;
use std::time::Duration;

const WARNING_AGE: Duration = Duration::from_secs(16 * 60);

fn review() -> SpecialistName {
    SpecialistName::new("review")
}

/// One unresponsive observation: session alive, heartbeat in the warning
/// bucket.
fn observe_unresponsive(harness: &Harness) {
    harness.add_specialist_session("review");
    harness.write_heartbeat("review", WARNING_AGE);
}

#[tokio::test]
async fn dead_specialist_is_restarted() {
    let harness = Harness::new();
    harness.sup.patrol().await;
    assert_eq!(harness.launcher.start_count("review"), 1);
    assert_eq!(harness.launcher.start_count("plan"), 1);
}

#[tokio::test]
async fn responsive_specialist_resets_failures() {
    let harness = Harness::new();
    observe_unresponsive(&harness);
    harness.sup.patrol().await;
    {
        let state = harness.sup.state.lock();
        assert_eq!(state.specialists[&review()].consecutive_failures, 1);
    }

    // Fresh heartbeat: responsive again
    harness.write_heartbeat("review", Duration::from_secs(10));
    harness.sup.patrol().await;

    let state = harness.sup.state.lock();
    let specialist = &state.specialists[&review()];
    assert_eq!(specialist.consecutive_failures, 0);
    assert!(specialist.last_response_time.is_some());
}

#[tokio::test]
async fn three_failures_force_kill_then_restart() {
    let harness = Harness::new();
    observe_unresponsive(&harness);

    for _ in 0..2 {
        let report = harness.sup.patrol().await;
        assert_eq!(report.force_kills, 0);
        harness.clock.advance(Duration::from_secs(30));
        // Keep the heartbeat in the warning bucket
        harness.write_heartbeat("review", WARNING_AGE);
    }

    let report = harness.sup.patrol().await;
    assert_eq!(report.force_kills, 1);
    assert_eq!(harness.mux.kill_count("pan-review"), 1);
    // Kill is followed by a restart
    assert_eq!(harness.launcher.start_count("review"), 1);

    let state = harness.sup.state.lock();
    let specialist = &state.specialists[&review()];
    assert_eq!(specialist.force_kill_count, 1);
    assert_eq!(specialist.consecutive_failures, 0);
    assert!(specialist.last_force_kill_time.is_some());
    assert_eq!(state.recent_deaths.len(), 1);
}

#[tokio::test]
async fn cooldown_blocks_second_kill_until_expiry() {
    let harness = Harness::new();

    // Drive to the first kill: three unresponsive observations 30s apart
    for _ in 0..3 {
        observe_unresponsive(&harness);
        harness.sup.patrol().await;
        harness.clock.advance(Duration::from_secs(30));
    }
    assert_eq!(harness.mux.kill_count("pan-review"), 1);

    // Still unresponsive 30s later, but in the 5-minute cooldown
    for _ in 0..4 {
        observe_unresponsive(&harness);
        let report = harness.sup.patrol().await;
        assert_eq!(report.force_kills, 0, "cooldown must spare the specialist");
        harness.clock.advance(Duration::from_secs(30));
    }
    assert_eq!(harness.mux.kill_count("pan-review"), 1);

    // Let the cooldown expire, then three fresh unresponsive observations
    harness.clock.advance(Duration::from_secs(5 * 60));
    for _ in 0..3 {
        observe_unresponsive(&harness);
        harness.sup.patrol().await;
        harness.clock.advance(Duration::from_secs(30));
    }
    assert_eq!(harness.mux.kill_count("pan-review"), 2);

    let state = harness.sup.state.lock();
    assert_eq!(state.specialists[&review()].force_kill_count, 2);
}

#[tokio::test]
async fn kill_updates_per_agent_health_counters() {
    let harness = Harness::new();
    for _ in 0..3 {
        observe_unresponsive(&harness);
        harness.sup.patrol().await;
        harness.clock.advance(Duration::from_secs(30));
    }

    let counters = harness.registry().load_health("review");
    assert_eq!(counters.kill_count, 1);
    assert_eq!(counters.consecutive_failures, 0);
}

#[tokio::test]
async fn dead_specialist_in_cooldown_is_not_restarted() {
    let harness = Harness::new();
    // Force a kill
    for _ in 0..3 {
        observe_unresponsive(&harness);
        harness.sup.patrol().await;
        harness.clock.advance(Duration::from_secs(30));
    }
    let restarts_after_kill = harness.launcher.start_count("review");

    // Session now dead (the fake kill left it dead); still in cooldown
    let report = harness.sup.patrol().await;
    assert_eq!(harness.launcher.start_count("review"), restarts_after_kill);
    assert_eq!(report.force_kills, 0);

    // After cooldown, the dead specialist is restarted again
    harness.clock.advance(Duration::from_secs(6 * 60));
    harness.sup.patrol().await;
    assert_eq!(
        harness.launcher.start_count("review"),
        restarts_after_kill + 1
    );
}

#[tokio::test]
async fn launcher_failure_is_contained() {
    let harness = Harness::new();
    harness.launcher.fail_starts();
    let report = harness.sup.patrol().await;
    // No restarts recorded, but the patrol completed all phases
    assert_eq!(report.restarts, 0);
    assert!(!report.skipped);
}
