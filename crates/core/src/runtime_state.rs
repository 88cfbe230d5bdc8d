// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hook-owned runtime state.
//!
//! The external hook writes `agents/<id>/runtime-state.json` as the agent
//! makes progress. The supervisor only performs two transitions: idle →
//! suspended (auto-suspend) and suspended → active (resume).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hook-reported lifecycle state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HookState {
    /// No hook output observed yet
    #[default]
    Uninitialized,
    /// Agent finished its turn and is waiting for input
    Idle,
    /// Agent is working
    Active,
    /// Session killed by auto-suspend; provider session id saved for resume
    Suspended,
}

impl fmt::Display for HookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Idle => write!(f, "idle"),
            Self::Active => write!(f, "active"),
            Self::Suspended => write!(f, "suspended"),
        }
    }
}

/// Per-agent runtime state file contents.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AgentRuntimeState {
    #[serde(default)]
    pub state: HookState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_tool: Option<String>,
    /// Provider-side conversation handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resumed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_issue: Option<String>,
}

#[cfg(test)]
#[path = "runtime_state_tests.rs"]
mod tests;
