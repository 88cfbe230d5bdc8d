// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-agent registry: records, session ids, ready latch, health counters,
//! activity tail.

use crate::{fsutil, StateLayout, StoreError};
use pan_core::{AgentRecord, AgentRuntimeState};
use serde::{Deserialize, Serialize};
use std::fs;

/// Per-agent failure/kill/recovery counters (`agents/<id>/health.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentHealthCounters {
    #[serde(default)]
    pub consecutive_failures: u32,
    #[serde(default)]
    pub kill_count: u32,
    #[serde(default)]
    pub recovery_count: u32,
}

/// One hook activity line (`agents/<id>/activity.jsonl`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub ts: chrono::DateTime<chrono::Utc>,
    pub tool: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Ready latch contents (`agents/<id>/ready.json`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ReadySignal {
    #[serde(default)]
    ready: bool,
}

#[derive(Debug, Clone)]
pub struct AgentRegistry {
    layout: StateLayout,
}

impl AgentRegistry {
    pub fn new(layout: StateLayout) -> Self {
        Self { layout }
    }

    // ── Records ──────────────────────────────────────────────────────────

    pub fn save(&self, record: &AgentRecord) -> Result<(), StoreError> {
        let path = self.layout.agent_record(record.id.as_str());
        fsutil::write_json_atomic(&path, record)
    }

    pub fn load(&self, agent_id: &str) -> Result<Option<AgentRecord>, StoreError> {
        fsutil::load_json(&self.layout.agent_record(agent_id))
    }

    /// Enumerate all records. Corrupt records are skipped with a warning;
    /// they remain on disk untouched.
    pub fn list(&self) -> Result<Vec<AgentRecord>, StoreError> {
        let dir = self.layout.agents_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&dir, e)),
        };

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
            let id = entry.file_name().to_string_lossy().to_string();
            match self.load(&id) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(agent_id = %id, error = %e, "skipping unreadable agent record");
                }
            }
        }
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    /// Explicit purge: remove the agent directory and its queue/heartbeat.
    pub fn remove(&self, agent_id: &str) -> Result<(), StoreError> {
        let dir = self.layout.agent_dir(agent_id);
        match fs::remove_dir_all(&dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io(&dir, e)),
        }
        for path in [
            self.layout.heartbeat(agent_id),
            self.layout.queue(agent_id),
        ] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(StoreError::io(&path, e)),
            }
        }
        Ok(())
    }

    // ── Runtime state (hook-owned; supervisor transitions only) ──────────

    pub fn load_runtime_state(
        &self,
        agent_id: &str,
    ) -> Result<Option<AgentRuntimeState>, StoreError> {
        fsutil::load_json(&self.layout.agent_runtime_state(agent_id))
    }

    pub fn save_runtime_state(
        &self,
        agent_id: &str,
        state: &AgentRuntimeState,
    ) -> Result<(), StoreError> {
        fsutil::write_json_atomic(&self.layout.agent_runtime_state(agent_id), state)
    }

    // ── Saved provider session id ────────────────────────────────────────

    pub fn save_session_id(&self, agent_id: &str, session_id: &str) -> Result<(), StoreError> {
        fsutil::write_string_atomic(&self.layout.agent_session_id(agent_id), session_id)
    }

    pub fn load_session_id(&self, agent_id: &str) -> Result<Option<String>, StoreError> {
        let path = self.layout.agent_session_id(agent_id);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let trimmed = contents.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    // ── Ready latch (single-shot: supervisor deletes, hook creates) ──────

    /// Remove any stale ready signal before a resume.
    pub fn clear_ready(&self, agent_id: &str) -> Result<(), StoreError> {
        let path = self.layout.agent_ready(agent_id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    pub fn ready_signaled(&self, agent_id: &str) -> bool {
        let path = self.layout.agent_ready(agent_id);
        match fsutil::load_json::<ReadySignal>(&path) {
            Ok(Some(signal)) => signal.ready,
            _ => false,
        }
    }

    // ── Health counters ──────────────────────────────────────────────────

    pub fn load_health(&self, agent_id: &str) -> AgentHealthCounters {
        fsutil::load_json_or_default(&self.layout.agent_health(agent_id))
    }

    pub fn save_health(
        &self,
        agent_id: &str,
        counters: &AgentHealthCounters,
    ) -> Result<(), StoreError> {
        fsutil::write_json_atomic(&self.layout.agent_health(agent_id), counters)
    }

    // ── Activity tail ────────────────────────────────────────────────────

    /// Last `n` activity entries, oldest first. The file is hook-written
    /// and lenient: blank or unparseable lines are skipped.
    pub fn activity_tail(&self, agent_id: &str, n: usize) -> Vec<ActivityEntry> {
        let path = self.layout.agent_activity(agent_id);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(_) => return Vec::new(),
        };
        let entries: Vec<ActivityEntry> = contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();
        let start = entries.len().saturating_sub(n);
        entries[start..].to_vec()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
