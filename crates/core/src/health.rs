// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat freshness classification and supervisor health state.

use crate::id::SpecialistName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Freshness of an agent's heartbeat, oldest bucket last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    Active,
    Stale,
    Warning,
    Stuck,
}

impl Freshness {
    /// Rank for monotonicity comparisons: active=0 .. stuck=3.
    pub fn rank(self) -> u8 {
        match self {
            Self::Active => 0,
            Self::Stale => 1,
            Self::Warning => 2,
            Self::Stuck => 3,
        }
    }

    pub fn needs_attention(self) -> bool {
        matches!(self, Self::Warning | Self::Stuck)
    }

    pub fn should_poke(self) -> bool {
        self == Self::Warning
    }

    pub fn should_kill(self) -> bool {
        self == Self::Stuck
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Stale => write!(f, "stale"),
            Self::Warning => write!(f, "warning"),
            Self::Stuck => write!(f, "stuck"),
        }
    }
}

/// Heartbeat age thresholds. Ages at an exact threshold fall to the older
/// bucket (`age == stale` classifies as Stale).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthThresholds {
    pub stale: Duration,
    pub warning: Duration,
    pub stuck: Duration,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            stale: Duration::from_secs(5 * 60),
            warning: Duration::from_secs(15 * 60),
            stuck: Duration::from_secs(30 * 60),
        }
    }
}

/// Classify a heartbeat age against the thresholds.
pub fn classify_age(age: Duration, thresholds: &HealthThresholds) -> Freshness {
    if age < thresholds.stale {
        Freshness::Active
    } else if age < thresholds.warning {
        Freshness::Stale
    } else if age < thresholds.stuck {
        Freshness::Warning
    } else {
        Freshness::Stuck
    }
}

/// Result of classifying one agent.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub state: Freshness,
    pub last_activity: Option<DateTime<Utc>>,
    /// Time since the last heartbeat; `None` when no heartbeat exists yet.
    pub time_since_activity: Option<Duration>,
    pub is_running: bool,
}

impl HealthReport {
    /// Session missing entirely.
    pub fn not_running() -> Self {
        Self {
            state: Freshness::Stuck,
            last_activity: None,
            time_since_activity: None,
            is_running: false,
        }
    }

    /// Session alive but no heartbeat file yet (spawn grace).
    pub fn no_heartbeat() -> Self {
        Self {
            state: Freshness::Active,
            last_activity: None,
            time_since_activity: None,
            is_running: true,
        }
    }
}

/// Persistent health record for one specialist.
///
/// `consecutive_failures` strictly resets to 0 on any responsive ping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistHealth {
    pub specialist_name: SpecialistName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_ping_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_response_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub consecutive_failures: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_force_kill_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub force_kill_count: u32,
}

impl SpecialistHealth {
    pub fn new(specialist_name: SpecialistName) -> Self {
        Self {
            specialist_name,
            last_ping_time: None,
            last_response_time: None,
            consecutive_failures: 0,
            last_force_kill_time: None,
            force_kill_count: 0,
        }
    }

    /// Whether a force kill at `now` would violate the post-kill cooldown.
    pub fn in_cooldown(&self, now: DateTime<Utc>, cooldown: Duration) -> bool {
        match self.last_force_kill_time {
            Some(killed) => match (now - killed).to_std() {
                Ok(elapsed) => elapsed < cooldown,
                // now precedes the kill timestamp (clock skew); stay safe
                Err(_) => true,
            },
            None => false,
        }
    }
}

/// Supervisor-owned state, persisted at `deacon/health-state.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SupervisorState {
    #[serde(default)]
    pub specialists: HashMap<SpecialistName, SpecialistHealth>,
    #[serde(default)]
    pub patrol_cycle: u64,
    /// Kill instants within the mass-death window, oldest first.
    #[serde(default)]
    pub recent_deaths: Vec<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_mass_death_alert: Option<DateTime<Utc>>,
}

impl SupervisorState {
    pub fn specialist_mut(&mut self, name: &SpecialistName) -> &mut SpecialistHealth {
        self.specialists
            .entry(name.clone())
            .or_insert_with(|| SpecialistHealth::new(name.clone()))
    }

    /// Drop deaths older than the window, preserving order.
    pub fn prune_deaths(&mut self, now: DateTime<Utc>, window: Duration) {
        self.recent_deaths.retain(|death| {
            (now - *death)
                .to_std()
                .map(|elapsed| elapsed <= window)
                .unwrap_or(true)
        });
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
