// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Phase 1: health-check every specialist.

use super::PatrolReport;
use crate::launcher::SpecialistLauncher;
use crate::supervisor::Supervisor;
use crate::SupervisorError;
use pan_adapters::{MuxAdapter, NotifyAdapter};
use pan_core::{Clock, SpecialistName};

/// Decision taken under the state lock, acted on after it is released.
enum HealthAction {
    None,
    Restart,
    ForceKill,
}

impl<M, N, C, L> Supervisor<M, N, C, L>
where
    M: MuxAdapter,
    N: NotifyAdapter,
    C: Clock,
    L: SpecialistLauncher,
{
    pub(crate) async fn check_specialists(
        &self,
        report: &mut PatrolReport,
    ) -> Result<(), SupervisorError> {
        let specialists: Vec<SpecialistName> = self.config.specialists.clone();
        for name in specialists {
            report.specialists_checked += 1;
            if let Err(e) = self.check_one_specialist(&name, report).await {
                // One unhealthy check must not hide the others
                tracing::warn!(specialist = %name, error = %e, "specialist check failed");
            }
        }
        Ok(())
    }

    async fn check_one_specialist(
        &self,
        name: &SpecialistName,
        report: &mut PatrolReport,
    ) -> Result<(), SupervisorError> {
        let agent_id = name.agent_id();
        let health = match self.classify(&agent_id).await {
            Ok(health) => health,
            Err(e) => {
                tracing::warn!(specialist = %name, error = %e, "not observed this tick");
                return Ok(());
            }
        };

        let now = self.now();
        let responsive = health.is_running && !health.state.needs_attention();

        let action = {
            let mut state = self.state.lock();
            let specialist = state.specialist_mut(name);
            specialist.last_ping_time = Some(now);

            if !health.is_running {
                if specialist.in_cooldown(now, self.config.kill_cooldown) {
                    tracing::debug!(specialist = %name, "dead but in post-kill cooldown");
                    HealthAction::None
                } else {
                    HealthAction::Restart
                }
            } else if responsive {
                specialist.consecutive_failures = 0;
                specialist.last_response_time = Some(now);
                HealthAction::None
            } else if specialist.in_cooldown(now, self.config.kill_cooldown) {
                // Spared entirely during the post-kill window; the failure
                // count restarts once the cooldown expires
                tracing::debug!(specialist = %name, "unresponsive but in cooldown");
                HealthAction::None
            } else {
                specialist.consecutive_failures += 1;
                let failures = specialist.consecutive_failures;
                if failures >= self.config.failure_threshold {
                    specialist.last_force_kill_time = Some(now);
                    specialist.force_kill_count += 1;
                    specialist.consecutive_failures = 0;
                    state.recent_deaths.push(now);
                    HealthAction::ForceKill
                } else {
                    tracing::info!(
                        specialist = %name,
                        failures,
                        freshness = %health.state,
                        "specialist unresponsive"
                    );
                    HealthAction::None
                }
            }
        };

        match action {
            HealthAction::None => {}
            HealthAction::Restart => {
                tracing::info!(specialist = %name, "specialist dead, restarting");
                self.launcher.start(name).await?;
                report.restarts += 1;
            }
            HealthAction::ForceKill => {
                tracing::warn!(specialist = %name, "force-killing unresponsive specialist");
                self.mux.kill_session(&agent_id.session_name()).await?;
                report.force_kills += 1;

                let mut counters = self.registry.load_health(agent_id.as_str());
                counters.kill_count += 1;
                counters.consecutive_failures = 0;
                if let Err(e) = self.registry.save_health(agent_id.as_str(), &counters) {
                    tracing::warn!(specialist = %name, error = %e, "failed to save health counters");
                }

                // A successful kill is followed by a restart
                self.launcher.start(name).await?;
                report.restarts += 1;
            }
        }
        Ok(())
    }
}
