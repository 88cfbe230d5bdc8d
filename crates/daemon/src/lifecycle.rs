// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: configuration, startup validation, instance lock.

use fs2::FileExt;
use pan_adapters::{DesktopNotifyAdapter, TmuxAdapter};
use pan_core::SystemClock;
use pan_routing::{Router, RoutingError};
use pan_store::{load_supervisor_config, StateLayout, StoreError};
use pan_supervisor::{AgentSpawner, Supervisor};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Supervisor with the production adapter stack.
pub type DaemonSupervisor = Supervisor<
    TmuxAdapter,
    DesktopNotifyAdapter,
    SystemClock,
    AgentSpawner<TmuxAdapter, SystemClock>,
>;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("cannot determine state directory (set PAN_STATE_DIR)")]
    NoStateDir,
    #[error("state root {path} is not writable: {source}")]
    RootNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config unreadable: {0}")]
    ConfigUnreadable(#[from] StoreError),
    #[error("router config invalid: {0}")]
    RouterInvalid(#[from] RoutingError),
    #[error("another pand instance holds the lock")]
    LockHeld,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Daemon configuration: a state root and the paths derived from it.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub layout: StateLayout,
    pub log_path: PathBuf,
    pub lock_path: PathBuf,
}

impl DaemonConfig {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self, LifecycleError> {
        Ok(Self::at(crate::env::state_dir()?))
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        let layout = StateLayout::new(root);
        Self {
            log_path: layout.daemon_log(),
            lock_path: layout.daemon_lock(),
            layout,
        }
    }
}

/// A started daemon: the supervisor plus the held instance lock.
pub struct Daemon {
    pub supervisor: Arc<DaemonSupervisor>,
    // NOTE(lifetime): held to maintain the exclusive instance lock;
    // released on drop
    #[allow(dead_code)]
    lock_file: File,
}

/// Validate the environment and construct the supervisor.
///
/// Fatal (non-zero exit) cases: state root not writable, supervisor or
/// router config unreadable, lock already held.
pub fn startup(config: &DaemonConfig) -> Result<Daemon, LifecycleError> {
    let layout = &config.layout;

    layout.ensure_dirs().map_err(|source| {
        LifecycleError::RootNotWritable {
            path: layout.root().to_path_buf(),
            source,
        }
    })?;

    let supervisor_config = load_supervisor_config(layout)?;
    let router = Router::load(&layout.supervisor_config())?;

    let lock_file = acquire_lock(&config.lock_path)?;

    let mux = TmuxAdapter::new();
    let clock = SystemClock;
    let launcher = AgentSpawner::new(layout.clone(), router.clone(), mux.clone(), clock.clone());
    let supervisor = Arc::new(Supervisor::new(
        supervisor_config,
        layout.clone(),
        router,
        mux,
        DesktopNotifyAdapter::new(),
        clock,
        launcher,
    ));

    for (work_type, choice) in supervisor.router().describe() {
        tracing::debug!(
            work_type = %work_type,
            model = %choice.model,
            source = ?choice.source,
            fallback = choice.used_fallback,
            "route"
        );
    }

    Ok(Daemon {
        supervisor,
        lock_file,
    })
}

/// Take the exclusive instance lock, writing our pid into it.
fn acquire_lock(path: &PathBuf) -> Result<File, LifecycleError> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)?;

    file.try_lock_exclusive()
        .map_err(|_| LifecycleError::LockHeld)?;

    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;
    Ok(file)
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
