// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase 5: detect and nudge lazy behavior.
//!
//! Best-effort and advisory. Agents whose issue already sits in the review
//! pipeline are skipped — a "what next?" prompt there belongs to a human.

use super::PatrolReport;
use crate::launcher::SpecialistLauncher;
use crate::lazy::ANTI_LAZY_MESSAGE;
use crate::supervisor::Supervisor;
use crate::SupervisorError;
use pan_adapters::{MuxAdapter, NotifyAdapter};
use pan_core::{AgentRecord, Clock};

impl<M, N, C, L> Supervisor<M, N, C, L>
where
    M: MuxAdapter,
    N: NotifyAdapter,
    C: Clock,
    L: SpecialistLauncher,
{
    pub(crate) async fn nudge_lazy(
        &self,
        report: &mut PatrolReport,
    ) -> Result<(), SupervisorError> {
        if self.lazy.pattern_count() == 0 {
            return Ok(());
        }

        let rows = self.review.load_all()?;
        for record in self.registry.list()? {
            let in_pipeline = rows
                .get(&record.issue_id)
                .map(|row| row.in_review_pipeline())
                .unwrap_or(false);
            if in_pipeline {
                continue;
            }
            if let Err(e) = self.nudge_if_lazy(&record, report).await {
                tracing::warn!(agent_id = %record.id, error = %e, "lazy check failed");
            }
        }
        Ok(())
    }

    async fn nudge_if_lazy(
        &self,
        record: &AgentRecord,
        report: &mut PatrolReport,
    ) -> Result<(), SupervisorError> {
        let session = record.id.session_name();
        if !self.mux.session_exists(&session).await? {
            return Ok(());
        }

        // Debounce before the capture: a cooled-down agent costs nothing
        if self.lazy_on_cooldown(&record.id) {
            return Ok(());
        }

        let scrollback = self
            .mux
            .capture_scrollback(&session, self.config.scrollback_lines)
            .await?;
        if !self.lazy.looks_lazy(&scrollback) {
            return Ok(());
        }

        self.mux.send_text(&session, ANTI_LAZY_MESSAGE).await?;
        self.mux.send_enter(&session).await?;
        self.lazy_last_sent
            .lock()
            .insert(record.id.clone(), self.clock.now());
        report.lazy_nudges += 1;
        tracing::info!(agent_id = %record.id, "sent anti-lazy nudge");
        Ok(())
    }

    fn lazy_on_cooldown(&self, agent_id: &pan_core::AgentId) -> bool {
        let last_sent = self.lazy_last_sent.lock();
        match last_sent.get(agent_id) {
            Some(at) => {
                let elapsed = self.clock.now().saturating_duration_since(*at);
                elapsed < self.config.lazy_cooldown
            }
            None => false,
        }
    }
}
