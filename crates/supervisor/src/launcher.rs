// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The specialist-initializer collaborator.
//!
//! The patrol never constructs specialist sessions itself; it delegates to
//! a launcher so the warm-pool bring-up (workspace choice, prompt, model)
//! stays outside the reconciliation loop.

use async_trait::async_trait;
use pan_core::{QueueItem, SpecialistName};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("start failed for {name}: {reason}")]
    StartFailed { name: String, reason: String },
    #[error("wake failed for {name}: {reason}")]
    WakeFailed { name: String, reason: String },
}

/// Starts and wakes specialists on behalf of the patrol.
#[async_trait]
pub trait SpecialistLauncher: Clone + Send + Sync + 'static {
    /// (Re)start a dead specialist with a warm session.
    async fn start(&self, name: &SpecialistName) -> Result<(), LauncherError>;

    /// Hand a queued task to an idle, live specialist.
    async fn wake(&self, name: &SpecialistName, task: &QueueItem) -> Result<(), LauncherError>;
}

/// Recorded launcher call
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherCall {
    Start { name: SpecialistName },
    Wake { name: SpecialistName, item_id: String },
}

/// Fake launcher for patrol tests: records calls, scriptable failures.
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct FakeLauncher {
    inner: std::sync::Arc<parking_lot::Mutex<FakeLauncherState>>,
}

#[cfg(any(test, feature = "test-support"))]
#[derive(Default)]
struct FakeLauncherState {
    calls: Vec<LauncherCall>,
    fail_starts: bool,
    fail_wakes: bool,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<LauncherCall> {
        self.inner.lock().calls.clone()
    }

    pub fn start_count(&self, name: &str) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, LauncherCall::Start { name: n } if n.as_str() == name))
            .count()
    }

    pub fn fail_starts(&self) {
        self.inner.lock().fail_starts = true;
    }

    pub fn fail_wakes(&self) {
        self.inner.lock().fail_wakes = true;
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl SpecialistLauncher for FakeLauncher {
    async fn start(&self, name: &SpecialistName) -> Result<(), LauncherError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LauncherCall::Start { name: name.clone() });
        if inner.fail_starts {
            return Err(LauncherError::StartFailed {
                name: name.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }

    async fn wake(&self, name: &SpecialistName, task: &QueueItem) -> Result<(), LauncherError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LauncherCall::Wake {
            name: name.clone(),
            item_id: task.id.as_str().to_string(),
        });
        if inner.fail_wakes {
            return Err(LauncherError::WakeFailed {
                name: name.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}
