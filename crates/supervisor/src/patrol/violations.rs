// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! FPP violation tracking, piggy-backed on the patrol.
//!
//! An agent that is idle by heartbeat while holding pending queued work is
//! violating first-priority protocol. Violations escalate through a nudge
//! ladder and end at a human once the ladder is exhausted.

use super::PatrolReport;
use crate::launcher::SpecialistLauncher;
use crate::supervisor::Supervisor;
use crate::SupervisorError;
use pan_adapters::{MuxAdapter, NotifyAdapter};
use pan_core::{AgentId, Clock, FppViolation, ViolationKind};

/// Nudge ladder: message chosen by how many nudges were already sent.
fn nudge_message(nudge_number: u32, issue: &str) -> String {
    match nudge_number {
        1 => format!(
            "Status check: your queue has pending work for {} but your hook shows no progress. \
             Please pick it up.",
            issue
        ),
        2 => format!(
            "Reminder: pending work for {} is still waiting in your queue. Resume it now.",
            issue
        ),
        _ => format!(
            "Act now: work for {} has been waiting through several checks. Start it immediately \
             or report what is blocking you.",
            issue
        ),
    }
}

impl<M, N, C, L> Supervisor<M, N, C, L>
where
    M: MuxAdapter,
    N: NotifyAdapter,
    C: Clock,
    L: SpecialistLauncher,
{
    pub(crate) async fn track_violations(
        &self,
        report: &mut PatrolReport,
    ) -> Result<(), SupervisorError> {
        for record in self.registry.list()? {
            if let Err(e) = self.track_one(&record.id, report).await {
                tracing::warn!(agent_id = %record.id, error = %e, "violation check failed");
            }
        }

        let removed = self
            .violations
            .clear_old(self.config.violation_retention, self.now())?;
        if removed > 0 {
            tracing::debug!(removed, "purged old resolved violations");
        }
        Ok(())
    }

    async fn track_one(
        &self,
        agent_id: &AgentId,
        report: &mut PatrolReport,
    ) -> Result<(), SupervisorError> {
        let health = match self.classify(agent_id).await {
            Ok(health) => health,
            Err(e) => {
                tracing::warn!(agent_id = %agent_id, error = %e, "not observed this tick");
                return Ok(());
            }
        };
        let check = self.queues.check(agent_id.as_str())?;

        let idle_enough = health
            .time_since_activity
            .map(|idle| idle >= self.config.hook_idle_threshold)
            .unwrap_or(false);
        let violating = health.is_running
            && health.state.rank() >= pan_core::Freshness::Stale.rank()
            && check.has_work
            && idle_enough;

        let open = self
            .violations
            .open_violation(agent_id, ViolationKind::HookIdle)?;

        if !violating {
            if open.is_some() {
                self.violations
                    .resolve(agent_id, ViolationKind::HookIdle, self.now())?;
                tracing::info!(agent_id = %agent_id, "hook-idle violation resolved");
            }
            return Ok(());
        }

        match open {
            None => {
                let violation =
                    FppViolation::open(agent_id.clone(), ViolationKind::HookIdle, self.now());
                self.violations.upsert(violation)?;
                report.violations_opened += 1;
                tracing::warn!(agent_id = %agent_id, "opened hook-idle violation");
            }
            Some(mut violation) => {
                if violation.needs_human {
                    return Ok(());
                }
                let issue = check
                    .items
                    .first()
                    .map(|item| item.payload.issue_id.to_string())
                    .unwrap_or_else(|| "your queue".to_string());

                violation.nudge_count += 1;
                violation.last_nudge_at = Some(self.now());
                let message = nudge_message(violation.nudge_count, &issue);

                let session = agent_id.session_name();
                self.mux.send_text(&session, &message).await?;
                self.mux.send_enter(&session).await?;
                report.violations_nudged += 1;
                tracing::info!(
                    agent_id = %agent_id,
                    nudge = violation.nudge_count,
                    "sent violation nudge"
                );

                if violation.nudge_count >= self.config.max_nudges {
                    violation.needs_human = true;
                    self.notify
                        .notify(
                            "Panopticon: agent needs attention",
                            &format!(
                                "{} ignored {} nudges with pending work",
                                agent_id, violation.nudge_count
                            ),
                        )
                        .await?;
                }
                self.violations.upsert(violation)?;
            }
        }
        Ok(())
    }
}
