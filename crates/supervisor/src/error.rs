// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the supervisor

use pan_adapters::{MuxError, NotifyError};
use pan_routing::RoutingError;
use pan_store::StoreError;
use thiserror::Error;

/// Errors that can occur in the supervisor and its spawn/resume paths
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("multiplexer error: {0}")]
    Mux(#[from] MuxError),
    #[error("notify error: {0}")]
    Notify(#[from] NotifyError),
    #[error(transparent)]
    Routing(#[from] RoutingError),
    #[error("launcher error: {0}")]
    Launcher(#[from] crate::launcher::LauncherError),
    #[error("agent record not found: {0}")]
    RecordNotFound(String),
    #[error("agent {0} already has a live session")]
    SessionExists(String),
    #[error("agent {0} is not suspended")]
    NotSuspended(String),
    #[error("agent {0} has no saved session id")]
    NoSavedSession(String),
}
