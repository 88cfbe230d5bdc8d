// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon.

use crate::lifecycle::LifecycleError;
use std::path::PathBuf;

/// Resolve the state root: `PAN_STATE_DIR` > platform data dir > `~/.local/share/panopticon`.
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("PAN_STATE_DIR") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    if let Some(data) = dirs::data_local_dir() {
        return Ok(data.join("panopticon"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/share/panopticon"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
