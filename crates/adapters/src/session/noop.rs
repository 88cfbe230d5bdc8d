// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op multiplexer adapter for environments without a multiplexer.

use super::{MuxAdapter, MuxError};
use async_trait::async_trait;
use std::path::Path;

#[derive(Clone, Copy, Default)]
pub struct NoOpMuxAdapter;

impl NoOpMuxAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MuxAdapter for NoOpMuxAdapter {
    async fn create_session(
        &self,
        _id: &str,
        _cwd: &Path,
        _cmd: &str,
        _env: &[(String, String)],
    ) -> Result<(), MuxError> {
        Ok(())
    }

    async fn kill_session(&self, _id: &str) -> Result<(), MuxError> {
        Ok(())
    }

    async fn send_text(&self, _id: &str, _text: &str) -> Result<(), MuxError> {
        Ok(())
    }

    async fn send_enter(&self, _id: &str) -> Result<(), MuxError> {
        Ok(())
    }

    async fn session_exists(&self, _id: &str) -> Result<bool, MuxError> {
        Ok(false)
    }

    async fn list_sessions(&self) -> Result<Vec<String>, MuxError> {
        Ok(Vec::new())
    }

    async fn capture_scrollback(&self, _id: &str, _lines: u32) -> Result<String, MuxError> {
        Ok(String::new())
    }
}
