// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The resume path.
//!
//! A suspended agent has no multiplexer session but a saved provider
//! session id. Resume recreates the session with the runtime's resume
//! command and waits for the hook's ready latch before posting a message.
//! The latch is single-shot: the supervisor deletes it before the spawn,
//! the hook recreates it once the conversation is re-attached.

use crate::launcher::SpecialistLauncher;
use crate::spawn::resume_command;
use crate::supervisor::Supervisor;
use crate::SupervisorError;
use pan_adapters::{MuxAdapter, NotifyAdapter};
use pan_core::{AgentId, Clock, HookState};
use std::time::Duration;

const READY_POLL: Duration = Duration::from_secs(1);

impl<M, N, C, L> Supervisor<M, N, C, L>
where
    M: MuxAdapter,
    N: NotifyAdapter,
    C: Clock,
    L: SpecialistLauncher,
{
    /// Resume a suspended agent, optionally posting a message once the
    /// hook signals ready.
    pub async fn resume_agent(
        &self,
        agent_id: &AgentId,
        message: Option<&str>,
    ) -> Result<(), SupervisorError> {
        let mut runtime_state = self
            .registry
            .load_runtime_state(agent_id.as_str())?
            .unwrap_or_default();
        if runtime_state.state != HookState::Suspended {
            return Err(SupervisorError::NotSuspended(agent_id.to_string()));
        }

        let provider_session = self
            .registry
            .load_session_id(agent_id.as_str())?
            .or_else(|| runtime_state.session_id.clone())
            .ok_or_else(|| SupervisorError::NoSavedSession(agent_id.to_string()))?;

        let record = self.registry.load(agent_id.as_str())?;
        let runtime = record
            .as_ref()
            .map(|record| record.runtime.clone())
            .unwrap_or_else(|| "claude".to_string());
        let cwd = record
            .as_ref()
            .map(|record| record.workspace_path.clone())
            .unwrap_or_else(|| self.layout.root().to_path_buf());

        self.registry.clear_ready(agent_id.as_str())?;

        let session = agent_id.session_name();
        let env = self.session_env(agent_id);
        self.mux
            .create_session(&session, &cwd, &resume_command(&runtime, &provider_session), &env)
            .await?;

        let ready = self.wait_for_ready(agent_id).await;
        if let Some(message) = message {
            if ready {
                self.mux.send_text(&session, message).await?;
                self.mux.send_enter(&session).await?;
            } else {
                tracing::warn!(
                    agent_id = %agent_id,
                    "ready signal never arrived, resuming without message"
                );
            }
        }

        runtime_state.state = HookState::Active;
        runtime_state.resumed_at = Some(self.now());
        runtime_state.session_id = Some(provider_session);
        self.registry
            .save_runtime_state(agent_id.as_str(), &runtime_state)?;

        tracing::info!(agent_id = %agent_id, ready, "agent resumed");
        Ok(())
    }

    /// Poll the ready latch at 1 s granularity, bounded by the configured
    /// ready timeout.
    async fn wait_for_ready(&self, agent_id: &AgentId) -> bool {
        let deadline = self.clock.now() + self.config.ready_timeout;
        loop {
            if self.registry.ready_signaled(agent_id.as_str()) {
                return true;
            }
            if self.clock.now() >= deadline {
                return false;
            }
            tokio::time::sleep(READY_POLL).await;
        }
    }

    pub(crate) fn session_env(&self, agent_id: &AgentId) -> Vec<(String, String)> {
        vec![
            ("PAN_AGENT_ID".to_string(), agent_id.to_string()),
            (
                "PAN_STATE_DIR".to_string(),
                self.layout.root().display().to_string(),
            ),
        ]
    }
}
