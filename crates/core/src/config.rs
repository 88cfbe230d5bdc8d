// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor tunables, loaded from `deacon/config.json`.
//!
//! Every field has a default so an absent file yields a working
//! configuration. Durations are written as strings (`"30s"`, `"5m"`).
//! Unknown keys are ignored.

use crate::health::HealthThresholds;
use crate::id::SpecialistName;
use crate::time_fmt::parse_duration;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Serialize durations as `"90s"`-style strings.
///
/// Serialization is always whole seconds so a round trip is lossless
/// (the display formatter would collapse 90 s to `"1m"`).
mod duration_str {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{}s", d.as_secs()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

fn default_patrol_interval() -> Duration {
    Duration::from_secs(30)
}
fn default_stale() -> Duration {
    Duration::from_secs(5 * 60)
}
fn default_warning() -> Duration {
    Duration::from_secs(15 * 60)
}
fn default_stuck() -> Duration {
    Duration::from_secs(30 * 60)
}
fn default_failure_threshold() -> u32 {
    3
}
fn default_kill_cooldown() -> Duration {
    Duration::from_secs(5 * 60)
}
fn default_specialist_idle_timeout() -> Duration {
    Duration::from_secs(5 * 60)
}
fn default_agent_idle_timeout() -> Duration {
    Duration::from_secs(10 * 60)
}
fn default_ready_timeout() -> Duration {
    Duration::from_secs(30)
}
fn default_lazy_cooldown() -> Duration {
    Duration::from_secs(5 * 60)
}
fn default_mass_death_window() -> Duration {
    Duration::from_secs(60)
}
fn default_mass_death_threshold() -> usize {
    2
}
fn default_alert_cooldown() -> Duration {
    Duration::from_secs(5 * 60)
}
fn default_hook_idle() -> Duration {
    Duration::from_secs(5 * 60)
}
fn default_max_nudges() -> u32 {
    3
}
fn default_violation_retention() -> Duration {
    Duration::from_secs(24 * 3600)
}
fn default_scrollback_lines() -> u32 {
    20
}
fn default_specialists() -> Vec<SpecialistName> {
    SpecialistName::well_known()
}

/// Built-in lazy-behavior patterns; tunable via config.
pub fn default_lazy_patterns() -> Vec<String> {
    [
        r"(?i)what would you like me to do",
        r"(?i)would you like me to (proceed|continue)",
        r"(?i)shall I (proceed|continue)",
        r"(?i)let me know (if|when|which|how)",
        r"(?m)^\s*\d+[.)]\s+\S.*\n\s*\d+[.)]\s+\S",
        r"(?i)deferred to (a )?future PR",
        r"(?i)requires human (input|review|intervention)",
        r"(?i)out of scope for this (task|change)",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    #[serde(default = "default_patrol_interval", with = "duration_str")]
    pub patrol_interval: Duration,

    /// Heartbeat freshness thresholds
    #[serde(default = "default_stale", with = "duration_str")]
    pub stale_after: Duration,
    #[serde(default = "default_warning", with = "duration_str")]
    pub warning_after: Duration,
    #[serde(default = "default_stuck", with = "duration_str")]
    pub stuck_after: Duration,

    /// Consecutive unresponsive observations before a force kill
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    /// Window after a force kill during which the same specialist is spared
    #[serde(default = "default_kill_cooldown", with = "duration_str")]
    pub kill_cooldown: Duration,

    /// Idle time before auto-suspend, per agent class
    #[serde(default = "default_specialist_idle_timeout", with = "duration_str")]
    pub specialist_idle_timeout: Duration,
    #[serde(default = "default_agent_idle_timeout", with = "duration_str")]
    pub agent_idle_timeout: Duration,

    /// How long the resume path waits for the hook's ready signal
    #[serde(default = "default_ready_timeout", with = "duration_str")]
    pub ready_timeout: Duration,

    /// Minimum gap between anti-lazy messages to one agent
    #[serde(default = "default_lazy_cooldown", with = "duration_str")]
    pub lazy_cooldown: Duration,
    #[serde(default = "default_scrollback_lines")]
    pub scrollback_lines: u32,
    #[serde(default = "default_lazy_patterns")]
    pub lazy_patterns: Vec<String>,

    /// Mass death detection
    #[serde(default = "default_mass_death_window", with = "duration_str")]
    pub mass_death_window: Duration,
    #[serde(default = "default_mass_death_threshold")]
    pub mass_death_threshold: usize,
    #[serde(default = "default_alert_cooldown", with = "duration_str")]
    pub alert_cooldown: Duration,

    /// FPP violation tracking
    #[serde(default = "default_hook_idle", with = "duration_str")]
    pub hook_idle_threshold: Duration,
    #[serde(default = "default_max_nudges")]
    pub max_nudges: u32,
    #[serde(default = "default_violation_retention", with = "duration_str")]
    pub violation_retention: Duration,

    /// The warm pool of named specialists
    #[serde(default = "default_specialists")]
    pub specialists: Vec<SpecialistName>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            patrol_interval: default_patrol_interval(),
            stale_after: default_stale(),
            warning_after: default_warning(),
            stuck_after: default_stuck(),
            failure_threshold: default_failure_threshold(),
            kill_cooldown: default_kill_cooldown(),
            specialist_idle_timeout: default_specialist_idle_timeout(),
            agent_idle_timeout: default_agent_idle_timeout(),
            ready_timeout: default_ready_timeout(),
            lazy_cooldown: default_lazy_cooldown(),
            scrollback_lines: default_scrollback_lines(),
            lazy_patterns: default_lazy_patterns(),
            mass_death_window: default_mass_death_window(),
            mass_death_threshold: default_mass_death_threshold(),
            alert_cooldown: default_alert_cooldown(),
            hook_idle_threshold: default_hook_idle(),
            max_nudges: default_max_nudges(),
            violation_retention: default_violation_retention(),
            specialists: default_specialists(),
        }
    }
}

impl SupervisorConfig {
    pub fn thresholds(&self) -> HealthThresholds {
        HealthThresholds {
            stale: self.stale_after,
            warning: self.warning_after,
            stuck: self.stuck_after,
        }
    }

    /// Idle timeout for an agent, by class.
    pub fn idle_timeout_for(&self, is_specialist: bool) -> Duration {
        if is_specialist {
            self.specialist_idle_timeout
        } else {
            self.agent_idle_timeout
        }
    }

    pub fn is_specialist(&self, id: &str) -> bool {
        self.specialists.iter().any(|s| s.as_str() == id)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
