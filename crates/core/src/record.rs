// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-agent registry record.
//!
//! One record per supervised agent, persisted at `agents/<id>/state.json`.
//! The record is created by the spawn path, mutated by the spawn/stop path
//! and the supervisor, and removed only by explicit purge.

use crate::id::{AgentId, IssueId};
use crate::work_type::WorkType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Lifecycle status of a supervised agent.
///
/// `Running` implies a live session existed at the most recent tick, or the
/// supervisor is about to reconcile it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Record written, session not yet confirmed
    Starting,
    /// Session confirmed alive
    Running,
    /// Stopped by the supervisor or an operator
    Stopped,
    /// Spawn or reconcile failure left for inspection
    Error,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starting => write!(f, "starting"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// On-disk record for a supervised agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Stable id, derived from the issue id. Authoritative over any
    /// session-name spelling.
    pub id: AgentId,
    pub issue_id: IssueId,
    pub workspace_path: PathBuf,
    /// Which CLI invokes the model (e.g. `claude`)
    pub runtime: String,
    /// Resolved model identifier
    pub model: String,
    pub status: AgentStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
    /// Free-form phase tag (e.g. `exploration`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// Work type used for model routing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_type: Option<WorkType>,
    /// Provider-side conversation handle saved for resume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl AgentRecord {
    /// Record as written by the spawn path before the session exists.
    pub fn starting(
        id: AgentId,
        issue_id: IssueId,
        workspace_path: PathBuf,
        runtime: impl Into<String>,
        model: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            issue_id,
            workspace_path,
            runtime: runtime.into(),
            model: model.into(),
            status: AgentStatus::Starting,
            started_at,
            last_activity: None,
            phase: None,
            work_type: None,
            session_id: None,
            branch: None,
        }
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
