// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal multiplexer adapters.
//!
//! One adapter per supported multiplexer. Every operation is bounded in
//! time; a hung multiplexer surfaces as [`MuxError::Timeout`] and is
//! reported by callers as a warning, never a fatal.

mod noop;
mod tmux;

pub use noop::NoOpMuxAdapter;
pub use tmux::TmuxAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMuxAdapter, FakeSession, MuxCall};

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from multiplexer operations
#[derive(Debug, Error)]
pub enum MuxError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("session already exists: {0}")]
    AlreadyExists(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
    #[error("command timed out: {0}")]
    Timeout(String),
}

/// Adapter over the host terminal multiplexer.
#[async_trait]
pub trait MuxAdapter: Clone + Send + Sync + 'static {
    /// Create a detached session running `cmd`. Fails when the id is taken.
    async fn create_session(
        &self,
        id: &str,
        cwd: &Path,
        cmd: &str,
        env: &[(String, String)],
    ) -> Result<(), MuxError>;

    /// Kill a session. Idempotent: a missing session is not an error.
    async fn kill_session(&self, id: &str) -> Result<(), MuxError>;

    /// Send literal text to a session (no key-name interpretation)
    async fn send_text(&self, id: &str, text: &str) -> Result<(), MuxError>;

    /// Send the Enter key to a session
    async fn send_enter(&self, id: &str) -> Result<(), MuxError>;

    /// Check if a session is alive
    async fn session_exists(&self, id: &str) -> Result<bool, MuxError>;

    /// Enumerate panopticon-owned sessions
    async fn list_sessions(&self) -> Result<Vec<String>, MuxError>;

    /// Capture the last `lines` lines of scrollback, non-blocking
    async fn capture_scrollback(&self, id: &str, lines: u32) -> Result<String, MuxError>;
}
