// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux multiplexer adapter

use super::{MuxAdapter, MuxError};
use async_trait::async_trait;
use pan_core::id::SESSION_PREFIX;
use std::path::Path;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Per-invocation bound on tmux commands. A hung tmux server must never
/// stall the patrol.
const TMUX_TIMEOUT: Duration = Duration::from_secs(2);

/// Tmux-based multiplexer adapter
#[derive(Clone, Default)]
pub struct TmuxAdapter;

impl TmuxAdapter {
    pub fn new() -> Self {
        Self
    }
}

async fn run_tmux(args: &[&str]) -> Result<Output, MuxError> {
    let invocation = || async {
        Command::new("tmux")
            .args(args)
            .output()
            .await
            .map_err(|e| MuxError::CommandFailed(e.to_string()))
    };

    match tokio::time::timeout(TMUX_TIMEOUT, invocation()).await {
        Ok(result) => result,
        Err(_) => Err(MuxError::Timeout(format!("tmux {}", args.join(" ")))),
    }
}

#[async_trait]
impl MuxAdapter for TmuxAdapter {
    async fn create_session(
        &self,
        id: &str,
        cwd: &Path,
        cmd: &str,
        env: &[(String, String)],
    ) -> Result<(), MuxError> {
        // Precondition: cwd must exist
        if !cwd.exists() {
            return Err(MuxError::SpawnFailed(format!(
                "working directory does not exist: {}",
                cwd.display()
            )));
        }

        let existing = run_tmux(&["has-session", "-t", id]).await;
        if existing.map(|o| o.status.success()).unwrap_or(false) {
            return Err(MuxError::AlreadyExists(id.to_string()));
        }

        let cwd_str = cwd.display().to_string();
        let mut args: Vec<String> = vec![
            "new-session".into(),
            "-d".into(),
            "-s".into(),
            id.into(),
            "-c".into(),
            cwd_str,
        ];
        for (key, value) in env {
            args.push("-e".into());
            args.push(format!("{}={}", key, value));
        }
        args.push(cmd.into());

        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = run_tmux(&arg_refs).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(session_id = id, stderr = %stderr, "tmux spawn failed");
            return Err(MuxError::SpawnFailed(stderr.to_string()));
        }

        // Log stderr even on success - may contain useful warnings
        if !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(session_id = id, stderr = %stderr, "tmux spawn stderr (non-fatal)");
        }

        Ok(())
    }

    async fn kill_session(&self, id: &str) -> Result<(), MuxError> {
        let output = run_tmux(&["kill-session", "-t", id]).await?;
        if !output.status.success() {
            // Session already dead, which is fine
            tracing::debug!(session_id = id, "kill-session on absent session");
        }
        Ok(())
    }

    async fn send_text(&self, id: &str, text: &str) -> Result<(), MuxError> {
        // -l = literal mode (no key name interpretation)
        // -- = end of options (handles text starting with -)
        let output = run_tmux(&["send-keys", "-t", id, "-l", "--", text]).await?;
        if !output.status.success() {
            return Err(MuxError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn send_enter(&self, id: &str) -> Result<(), MuxError> {
        let output = run_tmux(&["send-keys", "-t", id, "Enter"]).await?;
        if !output.status.success() {
            return Err(MuxError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn session_exists(&self, id: &str) -> Result<bool, MuxError> {
        let output = run_tmux(&["has-session", "-t", id]).await?;
        Ok(output.status.success())
    }

    async fn list_sessions(&self) -> Result<Vec<String>, MuxError> {
        let output = run_tmux(&["list-sessions", "-F", "#{session_name}"]).await?;
        if !output.status.success() {
            // tmux errors when no server is running; that means no sessions
            return Ok(Vec::new());
        }
        let names = String::from_utf8_lossy(&output.stdout);
        Ok(names
            .lines()
            .filter(|name| name.starts_with(SESSION_PREFIX))
            .map(str::to_string)
            .collect())
    }

    async fn capture_scrollback(&self, id: &str, lines: u32) -> Result<String, MuxError> {
        let start = format!("-{}", lines);
        let output = run_tmux(&["capture-pane", "-t", id, "-p", "-S", &start]).await?;
        if !output.status.success() {
            return Err(MuxError::NotFound(id.to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
