// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! FPP violation records: idle agents sitting on pending work.
//!
//! At most one unresolved violation exists per `(agent, kind)` pair. Nudges
//! escalate with `nudge_count`; after the maximum the violation is flagged
//! for human attention and further nudges are suppressed.

use crate::id::AgentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    HookIdle,
    PrStale,
    ReviewPending,
    StatusMismatch,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HookIdle => write!(f, "hook_idle"),
            Self::PrStale => write!(f, "pr_stale"),
            Self::ReviewPending => write!(f, "review_pending"),
            Self::StatusMismatch => write!(f, "status_mismatch"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FppViolation {
    pub agent_id: AgentId,
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub detected_at: DateTime<Utc>,
    #[serde(default)]
    pub nudge_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_nudge_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    /// Set when nudges are exhausted; suppresses further nudging.
    #[serde(default)]
    pub needs_human: bool,
}

impl FppViolation {
    pub fn open(agent_id: AgentId, kind: ViolationKind, detected_at: DateTime<Utc>) -> Self {
        Self {
            agent_id,
            kind,
            detected_at,
            nudge_count: 0,
            last_nudge_at: None,
            resolved: false,
            resolved_at: None,
            needs_human: false,
        }
    }

    /// Map key for the `(agent, kind)` uniqueness invariant.
    pub fn key(agent_id: &AgentId, kind: ViolationKind) -> String {
        format!("{}:{}", agent_id, kind)
    }
}

#[cfg(test)]
#[path = "violation_tests.rs"]
mod tests;
