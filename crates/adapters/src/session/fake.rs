// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake multiplexer adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{MuxAdapter, MuxError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded adapter call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MuxCall {
    Create {
        id: String,
        cwd: PathBuf,
        cmd: String,
        env: Vec<(String, String)>,
    },
    Kill {
        id: String,
    },
    SendText {
        id: String,
        text: String,
    },
    SendEnter {
        id: String,
    },
    Exists {
        id: String,
    },
    List,
    Capture {
        id: String,
        lines: u32,
    },
}

/// Fake session state
#[derive(Debug, Clone)]
pub struct FakeSession {
    pub cwd: PathBuf,
    pub cmd: String,
    pub env: Vec<(String, String)>,
    pub scrollback: Vec<String>,
    pub alive: bool,
}

#[derive(Default)]
struct FakeMuxState {
    sessions: HashMap<String, FakeSession>,
    calls: Vec<MuxCall>,
    fail_next_create: bool,
}

/// Fake multiplexer adapter: scriptable sessions, recorded calls.
#[derive(Clone, Default)]
pub struct FakeMuxAdapter {
    inner: Arc<Mutex<FakeMuxState>>,
}

impl FakeMuxAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<MuxCall> {
        self.inner.lock().calls.clone()
    }

    /// Count of kill calls issued against `id`
    pub fn kill_count(&self, id: &str) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, MuxCall::Kill { id: killed } if killed == id))
            .count()
    }

    /// Texts sent to `id` via send_text
    pub fn sent_texts(&self, id: &str) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                MuxCall::SendText { id: target, text } if target == id => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Get a session by ID
    pub fn get_session(&self, id: &str) -> Option<FakeSession> {
        self.inner.lock().sessions.get(id).cloned()
    }

    /// Add a pre-existing session by ID
    pub fn add_session(&self, id: &str, alive: bool) {
        self.inner.lock().sessions.insert(
            id.to_string(),
            FakeSession {
                cwd: PathBuf::new(),
                cmd: String::new(),
                env: Vec::new(),
                scrollback: Vec::new(),
                alive,
            },
        );
    }

    /// Remove a session entirely (simulates an external kill)
    pub fn drop_session(&self, id: &str) {
        self.inner.lock().sessions.remove(id);
    }

    /// Set session scrollback lines
    pub fn set_scrollback(&self, id: &str, lines: Vec<String>) {
        if let Some(session) = self.inner.lock().sessions.get_mut(id) {
            session.scrollback = lines;
        }
    }

    /// Make the next create_session call fail
    pub fn fail_next_create(&self) {
        self.inner.lock().fail_next_create = true;
    }
}

#[async_trait]
impl MuxAdapter for FakeMuxAdapter {
    async fn create_session(
        &self,
        id: &str,
        cwd: &Path,
        cmd: &str,
        env: &[(String, String)],
    ) -> Result<(), MuxError> {
        let mut inner = self.inner.lock();

        inner.calls.push(MuxCall::Create {
            id: id.to_string(),
            cwd: cwd.to_path_buf(),
            cmd: cmd.to_string(),
            env: env.to_vec(),
        });

        if inner.fail_next_create {
            inner.fail_next_create = false;
            return Err(MuxError::SpawnFailed("scripted failure".to_string()));
        }

        if inner.sessions.get(id).map(|s| s.alive).unwrap_or(false) {
            return Err(MuxError::AlreadyExists(id.to_string()));
        }

        inner.sessions.insert(
            id.to_string(),
            FakeSession {
                cwd: cwd.to_path_buf(),
                cmd: cmd.to_string(),
                env: env.to_vec(),
                scrollback: Vec::new(),
                alive: true,
            },
        );

        Ok(())
    }

    async fn kill_session(&self, id: &str) -> Result<(), MuxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(MuxCall::Kill { id: id.to_string() });
        if let Some(session) = inner.sessions.get_mut(id) {
            session.alive = false;
        }
        Ok(())
    }

    async fn send_text(&self, id: &str, text: &str) -> Result<(), MuxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(MuxCall::SendText {
            id: id.to_string(),
            text: text.to_string(),
        });
        if !inner.sessions.get(id).map(|s| s.alive).unwrap_or(false) {
            return Err(MuxError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn send_enter(&self, id: &str) -> Result<(), MuxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(MuxCall::SendEnter { id: id.to_string() });
        if !inner.sessions.get(id).map(|s| s.alive).unwrap_or(false) {
            return Err(MuxError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn session_exists(&self, id: &str) -> Result<bool, MuxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(MuxCall::Exists { id: id.to_string() });
        Ok(inner.sessions.get(id).map(|s| s.alive).unwrap_or(false))
    }

    async fn list_sessions(&self) -> Result<Vec<String>, MuxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(MuxCall::List);
        let mut ids: Vec<String> = inner
            .sessions
            .iter()
            .filter(|(_, s)| s.alive)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn capture_scrollback(&self, id: &str, lines: u32) -> Result<String, MuxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(MuxCall::Capture {
            id: id.to_string(),
            lines,
        });
        match inner.sessions.get(id) {
            Some(session) => {
                let start = session.scrollback.len().saturating_sub(lines as usize);
                Ok(session.scrollback[start..].join("\n"))
            }
            None => Err(MuxError::NotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
