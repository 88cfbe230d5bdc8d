// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only JSONL log of inter-specialist handoffs.
//!
//! Writes are append-only with newline framing. Readers tolerate blank
//! lines but a malformed line is a hard error: stats must never be
//! silently understated. Later rows with the same id amend earlier ones;
//! queries resolve latest-wins.

use crate::{StateLayout, StoreError};
use chrono::{DateTime, Utc};
use pan_core::{
    HandoffEvent, HandoffStats, HandoffStatus, IssueId, SpecialistTraffic,
};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct HandoffLog {
    path: PathBuf,
}

impl HandoffLog {
    pub fn new(layout: &StateLayout) -> Self {
        Self {
            path: layout.handoff_log(),
        }
    }

    /// Append one event as a single framed line.
    pub fn append(&self, event: &HandoffEvent) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let mut line = serde_json::to_string(event)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }

    /// Every raw row in append order. Strict on malformed lines.
    fn read_rows(&self) -> Result<Vec<HandoffEvent>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let mut rows = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let event =
                serde_json::from_str(line).map_err(|source| StoreError::MalformedLogLine {
                    path: self.path.clone(),
                    line: idx + 1,
                    source,
                })?;
            rows.push(event);
        }
        Ok(rows)
    }

    /// Latest row per handoff id, in append order of first appearance.
    fn read_latest(&self) -> Result<Vec<HandoffEvent>, StoreError> {
        let rows = self.read_rows()?;
        let mut order: Vec<pan_core::HandoffId> = Vec::new();
        let mut latest: HashMap<pan_core::HandoffId, HandoffEvent> = HashMap::new();
        for row in rows {
            if !latest.contains_key(&row.id) {
                order.push(row.id.clone());
            }
            latest.insert(row.id.clone(), row);
        }
        Ok(order.into_iter().filter_map(|id| latest.remove(&id)).collect())
    }

    /// All handoffs, most recent first, optionally limited.
    pub fn read_all(&self, limit: Option<usize>) -> Result<Vec<HandoffEvent>, StoreError> {
        let mut events = self.read_latest()?;
        events.reverse();
        if let Some(limit) = limit {
            events.truncate(limit);
        }
        Ok(events)
    }

    pub fn read_by_issue(&self, issue_id: &IssueId) -> Result<Vec<HandoffEvent>, StoreError> {
        Ok(self
            .read_all(None)?
            .into_iter()
            .filter(|event| event.issue_id == *issue_id)
            .collect())
    }

    /// Handoffs whose latest row falls on the current UTC calendar day.
    pub fn read_today(&self, now: DateTime<Utc>) -> Result<Vec<HandoffEvent>, StoreError> {
        let today = now.date_naive();
        Ok(self
            .read_all(None)?
            .into_iter()
            .filter(|event| event.timestamp.date_naive() == today)
            .collect())
    }

    pub fn stats(&self, now: DateTime<Utc>) -> Result<HandoffStats, StoreError> {
        let events = self.read_latest()?;
        let today = now.date_naive();

        let mut by_status: HashMap<HandoffStatus, usize> = HashMap::new();
        let mut by_specialist: HashMap<pan_core::SpecialistName, SpecialistTraffic> =
            HashMap::new();
        let mut today_count = 0;

        for event in &events {
            *by_status.entry(event.status).or_default() += 1;
            by_specialist
                .entry(event.from_specialist.clone())
                .or_default()
                .sent += 1;
            by_specialist
                .entry(event.to_specialist.clone())
                .or_default()
                .received += 1;
            if event.timestamp.date_naive() == today {
                today_count += 1;
            }
        }

        let completed = by_status.get(&HandoffStatus::Completed).copied().unwrap_or(0);
        let failed = by_status.get(&HandoffStatus::Failed).copied().unwrap_or(0);
        // Queued and processing rows are excluded from the denominator
        let success_rate = if completed + failed > 0 {
            Some(completed as f64 / (completed + failed) as f64)
        } else {
            None
        };

        Ok(HandoffStats {
            total_handoffs: events.len(),
            today_count,
            success_rate,
            queue_depth: by_status.get(&HandoffStatus::Queued).copied().unwrap_or(0),
            by_specialist,
            by_status,
        })
    }
}

#[cfg(test)]
#[path = "handoff_tests.rs"]
mod tests;
