// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat freshness classification (C3).

use crate::launcher::SpecialistLauncher;
use crate::supervisor::Supervisor;
use pan_adapters::{MuxAdapter, MuxError, NotifyAdapter};
use pan_core::{classify_age, AgentId, Clock, HealthReport};

impl<M, N, C, L> Supervisor<M, N, C, L>
where
    M: MuxAdapter,
    N: NotifyAdapter,
    C: Clock,
    L: SpecialistLauncher,
{
    /// Classify one agent's freshness.
    ///
    /// - Session missing → stuck, not running.
    /// - Session alive, no heartbeat yet → active (spawn grace).
    /// - Otherwise bucket the heartbeat age; exact thresholds fall to the
    ///   older bucket.
    ///
    /// An adapter error means the agent was not observed this tick; the
    /// caller skips it rather than acting on a guess.
    pub async fn classify(&self, agent_id: &AgentId) -> Result<HealthReport, MuxError> {
        let session = agent_id.session_name();
        let exists = self.mux.session_exists(&session).await?;
        if !exists {
            return Ok(HealthReport::not_running());
        }

        let Some(heartbeat) = self.heartbeats.read(agent_id.as_str()) else {
            return Ok(HealthReport::no_heartbeat());
        };

        let now_ms = self.clock.epoch_ms();
        let beat_ms = heartbeat.timestamp.timestamp_millis().max(0) as u64;
        let age = std::time::Duration::from_millis(now_ms.saturating_sub(beat_ms));

        Ok(HealthReport {
            state: classify_age(age, &self.config.thresholds()),
            last_activity: Some(heartbeat.timestamp),
            time_since_activity: Some(age),
            is_running: true,
        })
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
