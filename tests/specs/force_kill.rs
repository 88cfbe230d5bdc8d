//! Scenario: force-kill with cooldown for specialist `review`.
//!
//! Three consecutive unresponsive ticks kill the specialist; the 5-minute
//! cooldown spares it from a second kill until it expires.

use crate::prelude::*;
use std::time::Duration;

const WARNING_AGE: Duration = Duration::from_secs(16 * 60);

fn observe_unresponsive(world: &World) {
    world.mux.add_session("pan-review", true);
    world.write_heartbeat("review", WARNING_AGE);
}

#[tokio::test]
async fn kill_at_third_observation_then_cooldown_then_second_kill() {
    let world = World::new();

    // t = 0, 30, 60 s: three unresponsive observations
    for _ in 0..3 {
        observe_unresponsive(&world);
        world.sup.tick_once().await;
        world.clock.advance(Duration::from_secs(30));
    }
    assert_eq!(world.mux.kill_count("pan-review"), 1);

    // t = 90 s: unresponsive again but within the 5-minute cooldown
    observe_unresponsive(&world);
    world.sup.tick_once().await;
    assert_eq!(world.mux.kill_count("pan-review"), 1);

    // Cooldown expires; three fresh unresponsive observations kill again
    world.clock.advance(Duration::from_secs(5 * 60));
    for _ in 0..3 {
        observe_unresponsive(&world);
        world.sup.tick_once().await;
        world.clock.advance(Duration::from_secs(30));
    }
    assert_eq!(world.mux.kill_count("pan-review"), 2);
}

#[tokio::test]
async fn no_two_kills_closer_than_the_cooldown() {
    let world = World::new();
    let mut kill_times = Vec::new();

    // Hammer the supervisor with unresponsive observations every 20 s
    for tick in 0..40u64 {
        observe_unresponsive(&world);
        let before = world.mux.kill_count("pan-review");
        world.sup.tick_once().await;
        if world.mux.kill_count("pan-review") > before {
            kill_times.push(tick * 20);
        }
        world.clock.advance(Duration::from_secs(20));
    }

    assert!(kill_times.len() >= 2, "expected repeated kills");
    for pair in kill_times.windows(2) {
        assert!(
            pair[1] - pair[0] >= 5 * 60,
            "kills at {}s and {}s violate the cooldown",
            pair[0],
            pair[1]
        );
    }
}
