// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat file reader.
//!
//! Heartbeats are written by the external hook; the supervisor only reads
//! them. An absent or unreadable file reads as no heartbeat.

use crate::{fsutil, StateLayout};
use pan_core::Heartbeat;

#[derive(Debug, Clone)]
pub struct HeartbeatStore {
    layout: StateLayout,
}

impl HeartbeatStore {
    pub fn new(layout: StateLayout) -> Self {
        Self { layout }
    }

    pub fn read(&self, agent_id: &str) -> Option<Heartbeat> {
        let path = self.layout.heartbeat(agent_id);
        match fsutil::load_json(&path) {
            Ok(beat) => beat,
            Err(e) => {
                tracing::warn!(agent_id, error = %e, "unreadable heartbeat treated as absent");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
