//! Scenario: specialist `test` idle for six minutes is suspended with its
//! provider session preserved, then resumed by an urgent queue item.

use crate::prelude::*;
use pan_core::{HookState, Priority};
use std::time::Duration;

#[tokio::test]
async fn suspend_then_resume_on_queued_work() {
    let mut config = pan_core::SupervisorConfig::default();
    config.ready_timeout = Duration::ZERO;
    let world = World::with_config(config);
    let registry = world.registry();

    // Specialist `test` is idle for 6 minutes with a live session
    world.mux.add_session("pan-test", true);
    world.write_heartbeat("test", Duration::from_secs(10));
    world.write_runtime_state("test", HookState::Idle, Duration::from_secs(6 * 60));

    world.sup.tick_once().await;

    // The patrol killed the session and wrote the suspension
    assert_eq!(world.mux.kill_count("pan-test"), 1);
    let state = registry.load_runtime_state("test").unwrap().unwrap();
    assert_eq!(state.state, HookState::Suspended);
    // session.id preserved on disk
    let saved = registry.load_session_id("test").unwrap().unwrap();
    assert_eq!(saved, "prov-test");

    // Immediately submit urgent work for PAN-7
    let queues = world.queues();
    queues
        .submit("test", world.item("t-urgent", Priority::Urgent, "PAN-7"))
        .unwrap();

    // Next patrol resumes the specialist and completes the item
    let report = world.sup.tick_once().await;
    assert_eq!(report.drained, 1);
    assert!(queues.peek_next("test").unwrap().is_none());

    let state = registry.load_runtime_state("test").unwrap().unwrap();
    assert_eq!(state.state, HookState::Active);
    assert_eq!(state.session_id.as_deref(), Some(saved.as_str()));

    // The new session resumes the saved provider conversation
    let session = world.mux.get_session("pan-test").unwrap();
    assert!(session.alive);
    assert!(session.cmd.contains("--resume prov-test"), "{}", session.cmd);
}

#[tokio::test]
async fn resume_sends_message_once_the_hook_signals_ready() {
    let world = World::new();

    world.write_runtime_state("test", HookState::Suspended, Duration::from_secs(400));
    world.registry().save_session_id("test", "prov-test").unwrap();

    let queues = world.queues();
    queues
        .submit("test", world.item("t1", Priority::Urgent, "PAN-7"))
        .unwrap();

    // The hook drops the ready latch shortly after the session restarts;
    // the resume path deletes any stale latch first, so write it late.
    let ready_path = world.layout.agent_ready("test");
    let hook = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        pan_store::write_json_atomic(&ready_path, &serde_json::json!({"ready": true})).unwrap();
    });

    world.sup.tick_once().await;
    hook.await.unwrap();

    let texts = world.mux.sent_texts("pan-test");
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("PAN-7"), "{}", texts[0]);
}
