// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat file contents.
//!
//! The external hook touches `heartbeats/<id>.json` whenever the agent makes
//! progress; the supervisor only reads it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heartbeat {
    pub timestamp: DateTime<Utc>,
    /// Origin tag written by the hook (e.g. `post-tool-use`)
    #[serde(default)]
    pub source: String,
}
