// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inter-specialist handoff events.
//!
//! Appended to `logs/specialist-handoffs.jsonl`. Later rows with the same id
//! amend `status`/`result`; queries resolve latest-wins.

use crate::id::{HandoffId, IssueId, SpecialistName};
use crate::queue::Priority;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HandoffStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl fmt::Display for HandoffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One line of the handoff log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffEvent {
    pub id: HandoffId,
    pub timestamp: DateTime<Utc>,
    pub issue_id: IssueId,
    pub from_specialist: SpecialistName,
    pub to_specialist: SpecialistName,
    pub status: HandoffStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

/// Per-specialist sent/received counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpecialistTraffic {
    pub sent: usize,
    pub received: usize,
}

/// Aggregate answer for `stats()`.
///
/// `success_rate` excludes queued and processing rows from the denominator;
/// it is `None` when no handoff has finished yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffStats {
    pub total_handoffs: usize,
    pub today_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
    pub queue_depth: usize,
    pub by_specialist: HashMap<SpecialistName, SpecialistTraffic>,
    pub by_status: HashMap<HandoffStatus, usize>,
}
