// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for patrol tests: fake adapters, fake clock, temp state
//! tree.
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::launcher::FakeLauncher;
use crate::supervisor::Supervisor;
use pan_adapters::{FakeMuxAdapter, FakeNotifyAdapter};
use pan_core::{
    AgentId, AgentRecord, AgentRuntimeState, AgentStatus, Clock, FakeClock, Heartbeat, HookState,
    IssueId, ItemId, ItemKind, Payload, Priority, QueueItem, SupervisorConfig,
};
use pan_routing::{Router, RouterConfig};
use pan_store::{
    AgentRegistry, HeartbeatStore, QueueStore, ReviewStatusStore, StateLayout, ViolationStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub type TestSupervisor = Supervisor<FakeMuxAdapter, FakeNotifyAdapter, FakeClock, FakeLauncher>;

pub struct Harness {
    _dir: tempfile::TempDir,
    pub layout: StateLayout,
    pub mux: FakeMuxAdapter,
    pub notify: FakeNotifyAdapter,
    pub clock: FakeClock,
    pub launcher: FakeLauncher,
    pub sup: Arc<TestSupervisor>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(SupervisorConfig::default())
    }

    pub fn with_config(config: SupervisorConfig) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let layout = StateLayout::new(dir.path());
        layout.ensure_dirs().unwrap();

        let mux = FakeMuxAdapter::new();
        let notify = FakeNotifyAdapter::new();
        let clock = FakeClock::new();
        // A realistic wall-clock instant so age arithmetic never underflows
        clock.set_epoch_ms(1_785_492_000_000);
        let launcher = FakeLauncher::new();
        let router = Router::new(RouterConfig::default()).unwrap();

        let sup = Arc::new(Supervisor::new(
            config,
            layout.clone(),
            router,
            mux.clone(),
            notify.clone(),
            clock.clone(),
            launcher.clone(),
        ));

        Self {
            _dir: dir,
            layout,
            mux,
            notify,
            clock,
            launcher,
            sup,
        }
    }

    pub fn registry(&self) -> AgentRegistry {
        AgentRegistry::new(self.layout.clone())
    }

    pub fn queues(&self) -> QueueStore {
        QueueStore::new(self.layout.clone())
    }

    pub fn review(&self) -> ReviewStatusStore {
        ReviewStatusStore::new(self.layout.clone())
    }

    pub fn violations(&self) -> ViolationStore {
        ViolationStore::new(self.layout.clone())
    }

    pub fn heartbeats(&self) -> HeartbeatStore {
        HeartbeatStore::new(self.layout.clone())
    }

    /// Write a heartbeat `age` before the fake clock's now.
    pub fn write_heartbeat(&self, agent_id: &str, age: Duration) {
        let timestamp = self.clock.timestamp() - chrono::Duration::from_std(age).unwrap();
        let beat = Heartbeat {
            timestamp,
            source: "test".to_string(),
        };
        pan_store::write_json_atomic(&self.layout.heartbeat(agent_id), &beat).unwrap();
    }

    /// Write a hook runtime state with the given state and idle age.
    pub fn write_runtime_state(&self, agent_id: &str, state: HookState, idle_for: Duration) {
        let last_activity = self.clock.timestamp() - chrono::Duration::from_std(idle_for).unwrap();
        let runtime_state = AgentRuntimeState {
            state,
            last_activity: Some(last_activity),
            session_id: Some(format!("prov-{}", agent_id)),
            ..Default::default()
        };
        self.registry()
            .save_runtime_state(agent_id, &runtime_state)
            .unwrap();
    }

    /// Register a running agent record, with a live fake session.
    pub fn add_running_agent(&self, id: &str) -> AgentRecord {
        let mut record = AgentRecord::starting(
            AgentId::new(id),
            IssueId::new(id),
            PathBuf::from("/work").join(id),
            "claude",
            "claude-sonnet-4-5",
            self.clock.timestamp(),
        );
        record.status = AgentStatus::Running;
        self.registry().save(&record).unwrap();
        self.mux.add_session(&record.id.session_name(), true);
        record
    }

    /// Make a specialist's session live (without a registry record).
    pub fn add_specialist_session(&self, name: &str) {
        self.mux
            .add_session(&AgentId::new(name).session_name(), true);
    }

    pub fn item(&self, id: &str, priority: Priority, issue: &str) -> QueueItem {
        QueueItem {
            id: ItemId::new(id),
            kind: ItemKind::Task,
            priority,
            source: "test".to_string(),
            created_at: self.clock.timestamp(),
            payload: Payload::for_issue(issue),
        }
    }
}
