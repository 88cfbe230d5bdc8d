// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pan-core: domain types shared across the Panopticon supervisor

pub mod clock;
pub mod config;
pub mod handoff;
pub mod health;
pub mod heartbeat;
pub mod id;
pub mod queue;
pub mod record;
pub mod review;
pub mod runtime_state;
pub mod time_fmt;
pub mod violation;
pub mod work_type;

pub use clock::{Clock, SystemClock};
pub use config::SupervisorConfig;
pub use handoff::{HandoffEvent, HandoffStats, HandoffStatus, SpecialistTraffic};
pub use health::{
    classify_age, Freshness, HealthReport, HealthThresholds, SpecialistHealth, SupervisorState,
};
pub use heartbeat::Heartbeat;
pub use id::{AgentId, HandoffId, IdGen, IssueId, ItemId, ShortId, SpecialistName, UuidIdGen};
pub use queue::{ItemKind, Payload, Priority, QueueCheck, QueueItem};
pub use record::{AgentRecord, AgentStatus};
pub use review::{MergeStatus, ReviewStatus, ReviewStatusRow, TestStatus};
pub use runtime_state::{AgentRuntimeState, HookState};
pub use time_fmt::{format_elapsed, format_elapsed_ms, parse_duration};
pub use violation::{FppViolation, ViolationKind};
pub use work_type::{WorkType, WorkTypeError};

#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
#[cfg(any(test, feature = "test-support"))]
pub use id::SequentialIdGen;
