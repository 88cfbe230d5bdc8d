// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The tick driver (C1).
//!
//! `start` schedules a recurring patrol on the tokio runtime. Ticks never
//! overlap: the patrol gate drops an overdue tick while the previous one
//! is still running.

use crate::launcher::SpecialistLauncher;
use crate::patrol::PatrolReport;
use crate::supervisor::Supervisor;
use pan_adapters::{MuxAdapter, NotifyAdapter};
use pan_core::Clock;
use std::sync::Arc;
use std::time::Duration;

impl<M, N, C, L> Supervisor<M, N, C, L>
where
    M: MuxAdapter,
    N: NotifyAdapter,
    C: Clock,
    L: SpecialistLauncher,
{
    /// Start the recurring patrol. A second `start` is a no-op with a
    /// logged warning.
    pub fn start(self: &Arc<Self>, interval: Duration) {
        let mut task = self.tick_task.lock();
        if task.as_ref().map(|t| !t.is_finished()).unwrap_or(false) {
            tracing::warn!("tick driver already running, ignoring start");
            return;
        }

        let supervisor = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first interval tick fires immediately; skip it so start()
            // does not imply an instant patrol.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                supervisor.patrol().await;
            }
        });
        *task = Some(handle);
        tracing::info!(interval_s = interval.as_secs(), "tick driver started");
    }

    /// Stop the recurring patrol.
    pub fn stop(&self) {
        if let Some(handle) = self.tick_task.lock().take() {
            handle.abort();
            tracing::info!("tick driver stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.tick_task
            .lock()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Test entry point: run exactly one patrol now.
    pub async fn tick_once(&self) -> PatrolReport {
        self.patrol().await
    }
}

#[cfg(test)]
#[path = "ticker_tests.rs"]
mod tests;
