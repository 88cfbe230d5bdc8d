//! Scenario: two force-kills within 30 s raise one alert; a third kill
//! shortly after is counted but re-alerting is debounced for 5 minutes.

use crate::prelude::*;
use std::time::Duration;

/// Three unresponsive observations back to back force a kill.
async fn kill_specialist_now(world: &World, name: &str) {
    for _ in 0..3 {
        world.mux.add_session(&format!("pan-{}", name), true);
        world.write_heartbeat(name, Duration::from_secs(16 * 60));
        world.sup.tick_once().await;
    }
}

fn mass_alerts(world: &World) -> usize {
    world
        .notify
        .calls()
        .into_iter()
        .filter(|call| call.title.contains("mass"))
        .count()
}

#[tokio::test]
async fn alert_once_then_debounce() {
    let world = World::new();

    // Two kills 30 s apart
    kill_specialist_now(&world, "review").await;
    world.clock.advance(Duration::from_secs(30));
    kill_specialist_now(&world, "test").await;

    let check = world.sup.mass_death_check().await.unwrap();
    assert!(check.is_mass_death);
    assert_eq!(check.deaths_in_window, 2);
    assert_eq!(mass_alerts(&world), 1);

    // A third kill 20 s later is counted but does not re-alert
    world.clock.advance(Duration::from_secs(20));
    kill_specialist_now(&world, "merge").await;

    let check = world.sup.mass_death_check().await.unwrap();
    assert!(check.is_mass_death);
    assert!(!check.alerted);
    assert_eq!(mass_alerts(&world), 1);
}

#[tokio::test]
async fn window_decay_forgets_old_deaths() {
    let world = World::new();
    kill_specialist_now(&world, "review").await;

    world.clock.advance(Duration::from_secs(90));
    let check = world.sup.mass_death_check().await.unwrap();
    assert_eq!(check.deaths_in_window, 0);
    assert!(!check.is_mass_death);
}
