// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The patrol: one full pass of the supervisor loop.
//!
//! Phases run in order, each containing its own errors. Observations made
//! in an earlier phase may be stale by the time a later phase acts, so
//! every mutation re-checks its preconditions first.

mod drain;
mod health;
mod lazy;
mod mass_death;
mod orphans;
mod suspend;
mod violations;

pub use mass_death::MassDeathCheck;

use crate::launcher::SpecialistLauncher;
use crate::supervisor::Supervisor;
use pan_adapters::{MuxAdapter, NotifyAdapter};
use pan_core::Clock;

/// What one patrol did, for logging and tests.
#[derive(Debug, Default, Clone)]
pub struct PatrolReport {
    pub cycle: u64,
    /// The previous patrol was still running; this tick was dropped.
    pub skipped: bool,
    pub specialists_checked: usize,
    pub restarts: usize,
    pub force_kills: usize,
    pub drained: usize,
    pub suspended: usize,
    pub orphans_healed: usize,
    pub lazy_nudges: usize,
    pub mass_death_alerted: bool,
    pub violations_opened: usize,
    pub violations_nudged: usize,
    pub phase_errors: Vec<String>,
}

impl PatrolReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

impl<M, N, C, L> Supervisor<M, N, C, L>
where
    M: MuxAdapter,
    N: NotifyAdapter,
    C: Clock,
    L: SpecialistLauncher,
{
    /// Run one patrol. Never re-entrant: if a previous patrol still holds
    /// the gate, this tick is dropped.
    pub async fn patrol(&self) -> PatrolReport {
        let Ok(_gate) = self.patrol_gate.try_lock() else {
            tracing::warn!("previous patrol still running, dropping tick");
            return PatrolReport::skipped();
        };

        let cycle = {
            let mut state = self.state.lock();
            state.patrol_cycle += 1;
            state.patrol_cycle
        };
        let mut report = PatrolReport {
            cycle,
            ..PatrolReport::default()
        };
        tracing::debug!(cycle, "patrol start");

        if let Err(e) = self.check_specialists(&mut report).await {
            tracing::error!(cycle, error = %e, "health phase failed");
            report.phase_errors.push(format!("health: {}", e));
        }
        if let Err(e) = self.drain_queues(&mut report).await {
            tracing::error!(cycle, error = %e, "drain phase failed");
            report.phase_errors.push(format!("drain: {}", e));
        }
        if let Err(e) = self.auto_suspend(&mut report).await {
            tracing::error!(cycle, error = %e, "suspend phase failed");
            report.phase_errors.push(format!("suspend: {}", e));
        }
        if let Err(e) = self.heal_orphans(&mut report).await {
            tracing::error!(cycle, error = %e, "orphan phase failed");
            report.phase_errors.push(format!("orphans: {}", e));
        }
        if let Err(e) = self.nudge_lazy(&mut report).await {
            tracing::error!(cycle, error = %e, "lazy phase failed");
            report.phase_errors.push(format!("lazy: {}", e));
        }
        if let Err(e) = self.check_mass_death(&mut report).await {
            tracing::error!(cycle, error = %e, "mass-death phase failed");
            report.phase_errors.push(format!("mass-death: {}", e));
        }
        if let Err(e) = self.track_violations(&mut report).await {
            tracing::error!(cycle, error = %e, "violation phase failed");
            report.phase_errors.push(format!("violations: {}", e));
        }

        self.persist_state();
        tracing::info!(
            cycle,
            restarts = report.restarts,
            force_kills = report.force_kills,
            drained = report.drained,
            suspended = report.suspended,
            orphans = report.orphans_healed,
            lazy = report.lazy_nudges,
            "patrol complete"
        );
        report
    }
}
