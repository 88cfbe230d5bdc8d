// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::test_helpers::Harness;
use pan_core::Clock;
use std::time::Duration;

fn record_death(harness: &Harness) {
    let now = harness.sup.clock.timestamp();
    harness.sup.state.lock().recent_deaths.push(now);
}

#[tokio::test]
async fn below_threshold_is_quiet() {
    let harness = Harness::new();
    record_death(&harness);

    let check = harness.sup.mass_death_check().await.unwrap();
    assert!(!check.is_mass_death);
    assert!(!check.alerted);
    assert_eq!(harness.notify.count(), 0);
}

#[tokio::test]
async fn two_kills_within_the_window_alert_once() {
    let harness = Harness::new();
    record_death(&harness);
    harness.clock.advance(Duration::from_secs(30));
    record_death(&harness);

    let check = harness.sup.mass_death_check().await.unwrap();
    assert!(check.is_mass_death);
    assert!(check.alerted);
    assert_eq!(check.deaths_in_window, 2);
    assert_eq!(harness.notify.count(), 1);
    assert!(harness.notify.calls()[0].title.contains("mass"));

    // A third death 20 s later is counted but the alert is debounced
    harness.clock.advance(Duration::from_secs(20));
    record_death(&harness);
    let check = harness.sup.mass_death_check().await.unwrap();
    assert!(check.is_mass_death);
    assert!(!check.alerted);
    assert_eq!(harness.notify.count(), 1);
}

#[tokio::test]
async fn count_decays_outside_the_window() {
    let harness = Harness::new();
    record_death(&harness);
    record_death(&harness);

    harness.clock.advance(Duration::from_secs(61));
    let check = harness.sup.mass_death_check().await.unwrap();
    assert_eq!(check.deaths_in_window, 0);
    assert!(!check.is_mass_death);
    assert!(!check.alerted);
}

#[tokio::test]
async fn re_alert_after_the_alert_cooldown() {
    let harness = Harness::new();
    record_death(&harness);
    record_death(&harness);
    assert!(harness.sup.mass_death_check().await.unwrap().alerted);

    // New burst of deaths after the 5-minute alert cooldown
    harness.clock.advance(Duration::from_secs(5 * 60 + 1));
    record_death(&harness);
    record_death(&harness);
    let check = harness.sup.mass_death_check().await.unwrap();
    assert!(check.alerted);
    assert_eq!(harness.notify.count(), 2);
}

#[tokio::test]
async fn force_kills_feed_the_death_window() {
    let harness = Harness::new();
    // Drive one real force-kill through the patrol
    for _ in 0..3 {
        harness.add_specialist_session("review");
        harness.write_heartbeat("review", Duration::from_secs(16 * 60));
        harness.sup.patrol().await;
        harness.clock.advance(Duration::from_secs(10));
    }

    let state = harness.sup.state.lock();
    assert_eq!(state.recent_deaths.len(), 1);
}

#[tokio::test]
async fn alert_state_survives_restart() {
    let harness = Harness::new();
    record_death(&harness);
    record_death(&harness);
    assert!(harness.sup.mass_death_check().await.unwrap().alerted);
    harness.sup.persist_state();

    let persisted = pan_store::SupervisorStateStore::new(harness.layout.clone()).load();
    assert!(persisted.last_mass_death_alert.is_some());
}
