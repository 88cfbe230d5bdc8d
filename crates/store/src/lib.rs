// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pan-store: the persisted state tree.
//!
//! Everything lives under a single root directory and is shared with
//! external writers (the hook, the specialists, operator tooling). All
//! writes are temp+rename so partial writes are never observed; multi-writer
//! files additionally take a bounded advisory lock.

mod fsutil;
mod handoff;
mod heartbeat;
mod lock;
mod paths;
mod queue;
mod registry;
mod review;
mod sup_state;
mod violations;

pub use fsutil::{load_json, load_json_or_default, write_json_atomic, write_string_atomic};
pub use handoff::HandoffLog;
pub use heartbeat::HeartbeatStore;
pub use lock::with_file_lock;
pub use paths::StateLayout;
pub use queue::QueueStore;
pub use registry::{ActivityEntry, AgentHealthCounters, AgentRegistry};
pub use review::ReviewStatusStore;
pub use sup_state::{load_supervisor_config, SupervisorStateStore};
pub use violations::ViolationStore;

use std::path::PathBuf;
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Unparseable JSON. Readers treat this as absent but never overwrite
    /// the file (it is preserved for forensics).
    #[error("corrupt state file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The handoff log is strict: a malformed line aborts the reader so
    /// stats are never silently understated.
    #[error("malformed log line {line} in {path}: {source}")]
    MalformedLogLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
