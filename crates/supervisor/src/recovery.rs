// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crash recovery: an on-demand sweep, not part of the tick.
//!
//! Records claiming `running` whose sessions are gone get a fresh session
//! seeded with a recovery prompt, and their persistent recovery counter is
//! bumped.

use crate::launcher::SpecialistLauncher;
use crate::spawn::spawn_command;
use crate::supervisor::Supervisor;
use crate::SupervisorError;
use pan_adapters::{MuxAdapter, NotifyAdapter};
use pan_core::{AgentRecord, AgentStatus, Clock};

/// What a recovery sweep found and did.
#[derive(Debug, Default, Clone)]
pub struct RecoveryReport {
    pub checked: usize,
    pub recovered: Vec<String>,
    pub failures: Vec<String>,
    pub orphan_sessions_killed: Vec<String>,
}

impl<M, N, C, L> Supervisor<M, N, C, L>
where
    M: MuxAdapter,
    N: NotifyAdapter,
    C: Clock,
    L: SpecialistLauncher,
{
    /// Recreate sessions for agents that died with the supervisor.
    pub async fn recover_crashed_agents(&self) -> Result<RecoveryReport, SupervisorError> {
        let mut report = RecoveryReport::default();

        for record in self.registry.list()? {
            if record.status != AgentStatus::Running {
                continue;
            }
            report.checked += 1;

            let session = record.id.session_name();
            match self.mux.session_exists(&session).await {
                Ok(true) => continue,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(agent_id = %record.id, error = %e, "not observed, skipping");
                    continue;
                }
            }

            match self.recover_one(&record).await {
                Ok(()) => report.recovered.push(record.id.to_string()),
                Err(e) => {
                    tracing::error!(agent_id = %record.id, error = %e, "recovery failed");
                    report.failures.push(record.id.to_string());
                }
            }
        }

        self.prune_orphan_sessions(&mut report).await;

        if !report.recovered.is_empty() {
            tracing::info!(
                recovered = report.recovered.len(),
                "crash recovery recreated sessions"
            );
        }
        Ok(report)
    }

    /// Kill panopticon-owned sessions that no registry record claims.
    ///
    /// These accumulate when records are purged while their sessions are
    /// still attached. Best effort.
    async fn prune_orphan_sessions(&self, report: &mut RecoveryReport) {
        let sessions = match self.mux.list_sessions().await {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::warn!(error = %e, "cannot enumerate sessions, skipping prune");
                return;
            }
        };

        for session in sessions {
            let agent_id = pan_core::AgentId::normalize(&session);
            let known = matches!(self.registry.load(agent_id.as_str()), Ok(Some(_)));
            if known {
                continue;
            }
            tracing::warn!(session = %session, "killing orphaned session with no record");
            if let Err(e) = self.mux.kill_session(&session).await {
                tracing::warn!(session = %session, error = %e, "orphan kill failed");
                continue;
            }
            report.orphan_sessions_killed.push(session);
        }
    }

    async fn recover_one(&self, record: &AgentRecord) -> Result<(), SupervisorError> {
        let prompt = self.recovery_prompt(record);
        let command = spawn_command(&record.runtime, &record.model, Some(&prompt));
        let session = record.id.session_name();
        let env = self.session_env(&record.id);

        self.mux
            .create_session(&session, &record.workspace_path, &command, &env)
            .await?;

        let mut counters = self.registry.load_health(record.id.as_str());
        counters.recovery_count += 1;
        self.registry.save_health(record.id.as_str(), &counters)?;

        tracing::info!(
            agent_id = %record.id,
            recoveries = counters.recovery_count,
            "recreated session after crash"
        );
        Ok(())
    }

    fn recovery_prompt(&self, record: &AgentRecord) -> String {
        let last_tool = self
            .registry
            .activity_tail(record.id.as_str(), 1)
            .pop()
            .map(|entry| format!(" Your last recorded tool was {}.", entry.tool));

        format!(
            "Your previous session for issue {} died unexpectedly. Your workspace is {}. \
             Re-read the issue state, check your hook files, and continue where you left off.{}",
            record.issue_id,
            record.workspace_path.display(),
            last_tool.unwrap_or_default(),
        )
    }
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
