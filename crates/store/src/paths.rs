// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path layout of the persisted state tree.

use std::path::{Path, PathBuf};

/// Computes every path under the state root.
///
/// ```text
/// agents/<id>/state.json          agent record
/// agents/<id>/runtime-state.json  hook-owned runtime state
/// agents/<id>/activity.jsonl      last <= 100 hook activity entries
/// agents/<id>/session.id          saved provider session id
/// agents/<id>/ready.json          resume ready latch
/// agents/<id>/health.json         per-agent failure/kill/recovery counters
/// heartbeats/<id>.json            heartbeat
/// deacon/health-state.json        supervisor state
/// deacon/config.json              tunables
/// fpp-violations.json             violation map
/// review-status.json              issue -> review/test/merge row
/// logs/specialist-handoffs.jsonl  handoff log
/// hooks/<id>.json                 per-agent queue
/// ```
#[derive(Debug, Clone)]
pub struct StateLayout {
    root: PathBuf,
}

impl StateLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn agents_dir(&self) -> PathBuf {
        self.root.join("agents")
    }

    pub fn agent_dir(&self, id: &str) -> PathBuf {
        self.agents_dir().join(id)
    }

    pub fn agent_record(&self, id: &str) -> PathBuf {
        self.agent_dir(id).join("state.json")
    }

    pub fn agent_runtime_state(&self, id: &str) -> PathBuf {
        self.agent_dir(id).join("runtime-state.json")
    }

    pub fn agent_activity(&self, id: &str) -> PathBuf {
        self.agent_dir(id).join("activity.jsonl")
    }

    pub fn agent_session_id(&self, id: &str) -> PathBuf {
        self.agent_dir(id).join("session.id")
    }

    pub fn agent_ready(&self, id: &str) -> PathBuf {
        self.agent_dir(id).join("ready.json")
    }

    pub fn agent_health(&self, id: &str) -> PathBuf {
        self.agent_dir(id).join("health.json")
    }

    pub fn heartbeats_dir(&self) -> PathBuf {
        self.root.join("heartbeats")
    }

    pub fn heartbeat(&self, id: &str) -> PathBuf {
        self.heartbeats_dir().join(format!("{}.json", id))
    }

    pub fn deacon_dir(&self) -> PathBuf {
        self.root.join("deacon")
    }

    pub fn supervisor_state(&self) -> PathBuf {
        self.deacon_dir().join("health-state.json")
    }

    pub fn supervisor_config(&self) -> PathBuf {
        self.deacon_dir().join("config.json")
    }

    pub fn violations(&self) -> PathBuf {
        self.root.join("fpp-violations.json")
    }

    pub fn review_status(&self) -> PathBuf {
        self.root.join("review-status.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn handoff_log(&self) -> PathBuf {
        self.logs_dir().join("specialist-handoffs.jsonl")
    }

    pub fn daemon_log(&self) -> PathBuf {
        self.logs_dir().join("pand.log")
    }

    pub fn daemon_lock(&self) -> PathBuf {
        self.root.join("pand.lock")
    }

    pub fn queues_dir(&self) -> PathBuf {
        self.root.join("hooks")
    }

    pub fn queue(&self, id: &str) -> PathBuf {
        self.queues_dir().join(format!("{}.json", id))
    }

    /// Create the directory skeleton.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [
            self.agents_dir(),
            self.heartbeats_dir(),
            self.deacon_dir(),
            self.logs_dir(),
            self.queues_dir(),
        ] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
