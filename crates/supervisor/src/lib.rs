// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! pan-supervisor: the patrol.
//!
//! A single cooperative scheduler reconciles declared desired state (which
//! agents should exist, which specialists should be warm, which queued work
//! waits) against observed state (live sessions, heartbeat ages, queue
//! files, review rows) on a fixed tick. Phases run in order, never
//! concurrently with another patrol; a failing phase is logged and the
//! patrol continues.

mod classify;
mod error;
mod launcher;
mod lazy;
mod patrol;
mod recovery;
mod resume;
mod spawn;
mod supervisor;
mod ticker;

pub use error::SupervisorError;
pub use launcher::{LauncherError, SpecialistLauncher};
pub use lazy::{LazyDetector, ANTI_LAZY_MESSAGE};
pub use patrol::{MassDeathCheck, PatrolReport};
pub use recovery::RecoveryReport;
pub use spawn::{AgentSpawner, SpawnRequest};
pub use supervisor::Supervisor;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use launcher::{FakeLauncher, LauncherCall};

#[cfg(test)]
mod patrol_tests;
#[cfg(test)]
mod test_helpers;
