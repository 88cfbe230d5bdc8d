//! Scenario: freshness thresholds at their exact boundaries.

use crate::prelude::*;
use pan_core::{AgentId, Freshness};
use std::time::Duration;

async fn classify_at(age_ms: u64) -> Freshness {
    let world = World::new();
    world.mux.add_session("pan-PAN-1", true);
    world.write_heartbeat("PAN-1", Duration::from_millis(age_ms));
    world
        .sup
        .classify(&AgentId::new("PAN-1"))
        .await
        .unwrap()
        .state
}

#[tokio::test]
async fn age_300_000_ms_is_stale() {
    assert_eq!(classify_at(300_000).await, Freshness::Stale);
}

#[tokio::test]
async fn age_299_999_ms_is_active() {
    assert_eq!(classify_at(299_999).await, Freshness::Active);
}

#[tokio::test]
async fn age_1_800_000_ms_is_stuck() {
    assert_eq!(classify_at(1_800_000).await, Freshness::Stuck);
}

#[tokio::test]
async fn rank_is_monotone_over_the_sampled_ages() {
    let ages = [0u64, 299_999, 300_000, 899_999, 900_000, 1_799_999, 1_800_000, 3_600_000];
    let mut last_rank = 0;
    for age in ages {
        let rank = classify_at(age).await.rank();
        assert!(rank >= last_rank, "rank regressed at age {}", age);
        last_rank = rank;
    }
}
