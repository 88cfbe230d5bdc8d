// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase 6: mass-death detection.
//!
//! Force-kills append to `recent_deaths` (Phase 1); this phase prunes the
//! window and raises a debounced alert when too many land close together —
//! the signature of a provider outage or a broken shared dependency.

use super::PatrolReport;
use crate::launcher::SpecialistLauncher;
use crate::supervisor::Supervisor;
use crate::SupervisorError;
use pan_adapters::{MuxAdapter, NotifyAdapter};
use pan_core::Clock;

/// Outcome of one mass-death check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MassDeathCheck {
    pub is_mass_death: bool,
    pub deaths_in_window: usize,
    pub alerted: bool,
}

impl<M, N, C, L> Supervisor<M, N, C, L>
where
    M: MuxAdapter,
    N: NotifyAdapter,
    C: Clock,
    L: SpecialistLauncher,
{
    pub(crate) async fn check_mass_death(
        &self,
        report: &mut PatrolReport,
    ) -> Result<(), SupervisorError> {
        let check = self.mass_death_check().await?;
        report.mass_death_alerted = check.alerted;
        Ok(())
    }

    /// Prune the death window and alert if warranted. Alerts are debounced
    /// by the alert cooldown; the count itself keeps decaying regardless.
    pub async fn mass_death_check(&self) -> Result<MassDeathCheck, SupervisorError> {
        let now = self.now();

        let (deaths_in_window, should_alert) = {
            let mut state = self.state.lock();
            state.prune_deaths(now, self.config.mass_death_window);
            let count = state.recent_deaths.len();
            let is_mass = count >= self.config.mass_death_threshold;

            let debounced = state
                .last_mass_death_alert
                .map(|last| match (now - last).to_std() {
                    Ok(elapsed) => elapsed < self.config.alert_cooldown,
                    Err(_) => true,
                })
                .unwrap_or(false);

            let alert = is_mass && !debounced;
            if alert {
                state.last_mass_death_alert = Some(now);
            }
            (count, alert)
        };

        if should_alert {
            let message = format!(
                "{} agents force-killed within {}",
                deaths_in_window,
                pan_core::format_elapsed(self.config.mass_death_window.as_secs()),
            );
            tracing::error!(deaths = deaths_in_window, "mass death detected");
            self.notify.notify("Panopticon: mass agent death", &message).await?;
        }

        Ok(MassDeathCheck {
            is_mass_death: deaths_in_window >= self.config.mass_death_threshold,
            deaths_in_window,
            alerted: should_alert,
        })
    }
}
