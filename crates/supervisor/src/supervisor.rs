// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The supervisor handle.
//!
//! All process-wide mutable state lives on this handle: the persisted
//! specialist health map, the per-agent lazy cooldowns, and the tick task.
//! External observers read snapshots from disk, never this memory.

use crate::launcher::SpecialistLauncher;
use crate::lazy::LazyDetector;
use crate::SupervisorError;
use chrono::{DateTime, Utc};
use pan_adapters::{MuxAdapter, NotifyAdapter};
use pan_core::{
    AgentId, Clock, HandoffEvent, HandoffId, HandoffStatus, IdGen, IssueId, ItemId, ItemKind,
    Payload, Priority, QueueItem, SpecialistName, SupervisorConfig, SupervisorState, UuidIdGen,
};
use pan_routing::Router;
use pan_store::{
    AgentRegistry, HandoffLog, HeartbeatStore, QueueStore, ReviewStatusStore, StateLayout,
    SupervisorStateStore, ViolationStore,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::time::Instant;

pub struct Supervisor<M, N, C, L>
where
    M: MuxAdapter,
    N: NotifyAdapter,
    C: Clock,
    L: SpecialistLauncher,
{
    pub(crate) config: SupervisorConfig,
    pub(crate) layout: StateLayout,
    pub(crate) registry: AgentRegistry,
    pub(crate) heartbeats: HeartbeatStore,
    pub(crate) queues: QueueStore,
    pub(crate) review: ReviewStatusStore,
    pub(crate) violations: ViolationStore,
    pub(crate) state_store: SupervisorStateStore,
    pub(crate) handoffs: HandoffLog,
    pub(crate) router: Router,
    pub(crate) mux: M,
    pub(crate) notify: N,
    pub(crate) clock: C,
    pub(crate) launcher: L,
    pub(crate) ids: UuidIdGen,
    pub(crate) lazy: LazyDetector,

    /// Persisted supervisor state; saved after every patrol.
    pub(crate) state: Mutex<SupervisorState>,
    /// Per-agent anti-lazy cooldowns (in-memory; a restart only re-arms them)
    pub(crate) lazy_last_sent: Mutex<HashMap<AgentId, Instant>>,
    /// Non-overlap gate: an overdue tick that finds this held is dropped
    pub(crate) patrol_gate: tokio::sync::Mutex<()>,
    /// Tick task handle (C1)
    pub(crate) tick_task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl<M, N, C, L> Supervisor<M, N, C, L>
where
    M: MuxAdapter,
    N: NotifyAdapter,
    C: Clock,
    L: SpecialistLauncher,
{
    pub fn new(
        config: SupervisorConfig,
        layout: StateLayout,
        router: Router,
        mux: M,
        notify: N,
        clock: C,
        launcher: L,
    ) -> Self {
        let lazy = LazyDetector::from_patterns(&config.lazy_patterns);
        let state_store = SupervisorStateStore::new(layout.clone());
        let state = state_store.load();

        Self {
            registry: AgentRegistry::new(layout.clone()),
            heartbeats: HeartbeatStore::new(layout.clone()),
            queues: QueueStore::new(layout.clone()),
            review: ReviewStatusStore::new(layout.clone()),
            violations: ViolationStore::new(layout.clone()),
            handoffs: HandoffLog::new(&layout),
            state_store,
            config,
            layout,
            router,
            mux,
            notify,
            clock,
            launcher,
            ids: UuidIdGen,
            lazy,
            state: Mutex::new(state),
            lazy_last_sent: Mutex::new(HashMap::new()),
            patrol_gate: tokio::sync::Mutex::new(()),
            tick_task: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn layout(&self) -> &StateLayout {
        &self.layout
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.timestamp()
    }

    /// Persist the in-memory supervisor state.
    pub(crate) fn persist_state(&self) {
        let snapshot = self.state.lock().clone();
        if let Err(e) = self.state_store.save(&snapshot) {
            tracing::warn!(error = %e, "failed to persist supervisor state");
        }
    }

    /// Every registry record joined with its session liveness.
    ///
    /// An adapter error reads as not-alive; callers treating liveness as
    /// authoritative should re-check before acting.
    pub async fn list_agents(&self) -> Result<Vec<(pan_core::AgentRecord, bool)>, SupervisorError> {
        let mut agents = Vec::new();
        for record in self.registry.list()? {
            let alive = self
                .mux
                .session_exists(&record.id.session_name())
                .await
                .unwrap_or(false);
            agents.push((record, alive));
        }
        Ok(agents)
    }

    // ── Handoffs ─────────────────────────────────────────────────────────

    /// Queue work for a specialist and record the handoff.
    ///
    /// Writes the handoff event (status `queued`) and submits a queue item
    /// whose context carries the handoff id, so the drain phase can amend
    /// the event as it progresses.
    pub fn submit_handoff(
        &self,
        from: &SpecialistName,
        to: &SpecialistName,
        issue_id: IssueId,
        priority: Priority,
        context: BTreeMap<String, String>,
    ) -> Result<HandoffId, SupervisorError> {
        let handoff_id = HandoffId::new(self.ids.next());
        let now = self.now();

        let event = HandoffEvent {
            id: handoff_id.clone(),
            timestamp: now,
            issue_id: issue_id.clone(),
            from_specialist: from.clone(),
            to_specialist: to.clone(),
            status: HandoffStatus::Queued,
            result: None,
            priority,
            context: context.clone(),
        };
        self.handoffs.append(&event)?;

        let mut payload = Payload::for_issue(issue_id);
        payload.context = context;
        payload
            .context
            .insert("handoff_id".to_string(), handoff_id.to_string());

        let item = QueueItem {
            id: ItemId::new(self.ids.next()),
            kind: ItemKind::Task,
            priority,
            source: format!("handoff:{}", from),
            created_at: now,
            payload,
        };
        self.queues.submit(to.as_str(), item)?;

        tracing::info!(
            handoff_id = %handoff_id,
            from = %from,
            to = %to,
            priority = %priority,
            "handoff queued"
        );
        Ok(handoff_id)
    }

    /// Amend a previously logged handoff (best effort; drain progress must
    /// not fail the patrol).
    pub(crate) fn amend_handoff(
        &self,
        item: &QueueItem,
        to: &SpecialistName,
        status: HandoffStatus,
        result: Option<String>,
    ) {
        let Some(handoff_id) = item.payload.context.get("handoff_id") else {
            return;
        };
        let event = HandoffEvent {
            id: HandoffId::new(handoff_id.clone()),
            timestamp: self.now(),
            issue_id: item.payload.issue_id.clone(),
            from_specialist: SpecialistName::new(
                item.source.strip_prefix("handoff:").unwrap_or(&item.source),
            ),
            to_specialist: to.clone(),
            status,
            result,
            priority: item.priority,
            context: item.payload.context.clone(),
        };
        if let Err(e) = self.handoffs.append(&event) {
            tracing::warn!(handoff_id, error = %e, "failed to amend handoff log");
        }
    }
}
