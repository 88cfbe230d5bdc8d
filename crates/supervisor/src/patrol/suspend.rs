// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase 3: auto-suspend idle agents.
//!
//! Suspension preserves the provider session id on disk so the agent can
//! be resumed later; only the multiplexer session dies.

use super::PatrolReport;
use crate::launcher::SpecialistLauncher;
use crate::supervisor::Supervisor;
use crate::SupervisorError;
use pan_adapters::{MuxAdapter, NotifyAdapter};
use pan_core::{AgentId, Clock, HookState};

impl<M, N, C, L> Supervisor<M, N, C, L>
where
    M: MuxAdapter,
    N: NotifyAdapter,
    C: Clock,
    L: SpecialistLauncher,
{
    pub(crate) async fn auto_suspend(
        &self,
        report: &mut PatrolReport,
    ) -> Result<(), SupervisorError> {
        let records = self.registry.list()?;
        let mut candidates: Vec<AgentId> = records.into_iter().map(|record| record.id).collect();
        for name in &self.config.specialists {
            let id = name.agent_id();
            if !candidates.contains(&id) {
                candidates.push(id);
            }
        }

        for agent_id in candidates {
            if let Err(e) = self.suspend_if_idle(&agent_id, report).await {
                tracing::warn!(agent_id = %agent_id, error = %e, "suspend check failed");
            }
        }
        Ok(())
    }

    async fn suspend_if_idle(
        &self,
        agent_id: &AgentId,
        report: &mut PatrolReport,
    ) -> Result<(), SupervisorError> {
        let runtime_state = match self.registry.load_runtime_state(agent_id.as_str())? {
            Some(state) => state,
            None => return Ok(()),
        };
        if runtime_state.state != HookState::Idle {
            return Ok(());
        }
        let Some(last_activity) = runtime_state.last_activity else {
            return Ok(());
        };

        let idle = (self.now() - last_activity).to_std().unwrap_or_default();
        let timeout = self
            .config
            .idle_timeout_for(self.config.is_specialist(agent_id.as_str()));
        if idle <= timeout {
            return Ok(());
        }

        // Precondition re-check: the session must still exist
        let session = agent_id.session_name();
        if !self.mux.session_exists(&session).await? {
            return Ok(());
        }

        // Save the provider session id before the kill so resume stays possible
        if let Some(ref provider_session) = runtime_state.session_id {
            self.registry
                .save_session_id(agent_id.as_str(), provider_session)?;
        }

        self.mux.kill_session(&session).await?;

        let mut suspended = runtime_state;
        suspended.state = HookState::Suspended;
        suspended.suspended_at = Some(self.now());
        self.registry
            .save_runtime_state(agent_id.as_str(), &suspended)?;

        report.suspended += 1;
        tracing::info!(
            agent_id = %agent_id,
            idle = %pan_core::format_elapsed(idle.as_secs()),
            "auto-suspended idle agent"
        );
        Ok(())
    }
}
