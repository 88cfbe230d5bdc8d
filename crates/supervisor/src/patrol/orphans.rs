// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase 4: heal orphaned review/test rows.
//!
//! A row claiming `reviewing`/`testing` while the owning specialist is not
//! active describes work nobody is doing; downgrading it to `pending` lets
//! the pipeline pick it up again. This is the supervisor's only mutation
//! of the external status file.

use super::PatrolReport;
use crate::launcher::SpecialistLauncher;
use crate::supervisor::Supervisor;
use crate::SupervisorError;
use pan_adapters::{MuxAdapter, NotifyAdapter};
use pan_core::{Clock, HookState, ReviewStatus, SpecialistName, TestStatus};

impl<M, N, C, L> Supervisor<M, N, C, L>
where
    M: MuxAdapter,
    N: NotifyAdapter,
    C: Clock,
    L: SpecialistLauncher,
{
    pub(crate) async fn heal_orphans(
        &self,
        report: &mut PatrolReport,
    ) -> Result<(), SupervisorError> {
        let mut rows = self.review.load_all()?;
        if rows.is_empty() {
            return Ok(());
        }

        let review_active = self.specialist_active(SpecialistName::REVIEW)?;
        let test_active = self.specialist_active(SpecialistName::TEST)?;

        let mut healed = 0;
        for (issue_id, row) in rows.iter_mut() {
            if row.review_status == Some(ReviewStatus::Reviewing) && !review_active {
                tracing::warn!(issue_id = %issue_id, "healing orphaned review row");
                row.review_status = Some(ReviewStatus::Pending);
                healed += 1;
            }
            if row.test_status == Some(TestStatus::Testing) && !test_active {
                tracing::warn!(issue_id = %issue_id, "healing orphaned test row");
                row.test_status = Some(TestStatus::Pending);
                healed += 1;
            }
        }

        // Idempotent: no rewrite when nothing changed
        if healed > 0 {
            self.review.save_all(&rows)?;
            report.orphans_healed += healed;
        }
        Ok(())
    }

    fn specialist_active(&self, name: &str) -> Result<bool, SupervisorError> {
        let state = self
            .registry
            .load_runtime_state(name)?
            .map(|runtime_state| runtime_state.state)
            .unwrap_or_default();
        Ok(state == HookState::Active)
    }
}
