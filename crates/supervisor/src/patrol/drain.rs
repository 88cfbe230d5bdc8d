// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase 2: drain specialist queues.

use super::PatrolReport;
use crate::launcher::SpecialistLauncher;
use crate::supervisor::Supervisor;
use crate::SupervisorError;
use pan_adapters::{MuxAdapter, NotifyAdapter};
use pan_core::{Clock, HandoffStatus, HookState, SpecialistName};

impl<M, N, C, L> Supervisor<M, N, C, L>
where
    M: MuxAdapter,
    N: NotifyAdapter,
    C: Clock,
    L: SpecialistLauncher,
{
    pub(crate) async fn drain_queues(
        &self,
        report: &mut PatrolReport,
    ) -> Result<(), SupervisorError> {
        let specialists: Vec<SpecialistName> = self.config.specialists.clone();
        for name in specialists {
            if let Err(e) = self.drain_one(&name, report).await {
                tracing::warn!(specialist = %name, error = %e, "drain failed");
            }
        }
        Ok(())
    }

    async fn drain_one(
        &self,
        name: &SpecialistName,
        report: &mut PatrolReport,
    ) -> Result<(), SupervisorError> {
        let Some(head) = self.queues.peek_next(name.as_str())? else {
            return Ok(());
        };

        // Corrupt runtime state: skip rather than guess (and never overwrite)
        let runtime_state = self
            .registry
            .load_runtime_state(name.as_str())?
            .unwrap_or_default();

        match runtime_state.state {
            HookState::Suspended => {
                let message = format!(
                    "Processing queued task {} for {}",
                    head.id.short(8),
                    head.payload.issue_id
                );
                self.resume_agent(&name.agent_id(), Some(&message)).await?;
                self.queues.complete(name.as_str(), &head.id)?;
                self.amend_handoff(&head, name, HandoffStatus::Processing, None);
                report.drained += 1;
                tracing::info!(specialist = %name, item = %head.id.short(8), "resumed for queued task");
            }
            HookState::Idle => {
                self.launcher.wake(name, &head).await?;
                self.queues.complete(name.as_str(), &head.id)?;
                self.amend_handoff(&head, name, HandoffStatus::Processing, None);
                report.drained += 1;
                tracing::info!(specialist = %name, item = %head.id.short(8), "woke with queued task");
            }
            HookState::Active | HookState::Uninitialized => {
                // Busy or unknown: leave the queue alone this tick
            }
        }
        Ok(())
    }
}
