// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue item types.
//!
//! Each agent has one priority queue persisted at `hooks/<id>.json`. Ordering
//! is a stable sort by `(priority rank, insertion order)`; items are removed
//! only via `complete`.

use crate::id::{IssueId, ItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Queue priority, urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Normal,
    Low,
}

impl Priority {
    /// Rank for ordering: urgent=0 < high < normal < low.
    pub fn rank(self) -> u8 {
        match self {
            Self::Urgent => 0,
            Self::High => 1,
            Self::Normal => 2,
            Self::Low => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Urgent => write!(f, "urgent"),
            Self::High => write!(f, "high"),
            Self::Normal => write!(f, "normal"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// What kind of work a queue item carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Task,
    Message,
}

/// Structured payload with a free-form context bag.
///
/// Producers and consumers agree on bag keys document-by-document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payload {
    pub issue_id: IssueId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_url: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

impl Payload {
    pub fn for_issue(issue_id: impl Into<IssueId>) -> Self {
        Self {
            issue_id: issue_id.into(),
            workspace: None,
            branch: None,
            pr_url: None,
            context: BTreeMap::new(),
        }
    }
}

/// One queued task or message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueItem {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub priority: Priority,
    /// Free-form origin tag (e.g. `handoff:review`)
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub payload: Payload,
}

/// Snapshot answer for `check(agent_id)`.
#[derive(Debug, Clone)]
pub struct QueueCheck {
    pub has_work: bool,
    pub urgent_count: usize,
    pub items: Vec<QueueItem>,
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
