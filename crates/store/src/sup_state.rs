// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor-owned persisted state and tunables (`deacon/`).

use crate::{fsutil, StateLayout, StoreError};
use pan_core::{SupervisorConfig, SupervisorState};

#[derive(Debug, Clone)]
pub struct SupervisorStateStore {
    layout: StateLayout,
}

impl SupervisorStateStore {
    pub fn new(layout: StateLayout) -> Self {
        Self { layout }
    }

    /// Load persisted state; absent or unreadable files start fresh.
    ///
    /// The supervisor exclusively owns this file, so an unreadable copy
    /// means a crash mid-write predating temp+rename or operator edits;
    /// starting fresh only loses cooldown bookkeeping.
    pub fn load(&self) -> SupervisorState {
        fsutil::load_json_or_default(&self.layout.supervisor_state())
    }

    pub fn save(&self, state: &SupervisorState) -> Result<(), StoreError> {
        fsutil::write_json_atomic(&self.layout.supervisor_state(), state)
    }
}

/// Load tunables from `deacon/config.json`.
///
/// Absent file → defaults. Unreadable file is an error: the daemon treats
/// this as fatal at startup, while mid-flight reloads log and keep the
/// previous configuration.
pub fn load_supervisor_config(layout: &StateLayout) -> Result<SupervisorConfig, StoreError> {
    Ok(fsutil::load_json(&layout.supervisor_config())?.unwrap_or_default())
}

#[cfg(test)]
#[path = "sup_state_tests.rs"]
mod tests;
