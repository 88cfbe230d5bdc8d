// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desktop notification adapter.
//!
//! Alerts are fire-and-forget: the supervisor must never stall on the
//! notification center. Failures downgrade to a log line.

use super::{NotifyAdapter, NotifyError};
use async_trait::async_trait;

#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifyAdapter;

impl DesktopNotifyAdapter {
    pub fn new() -> Self {
        // mac-notification-sys looks up a bundle identifier via AppleScript
        // on first use; in a daemon without Automation permissions that
        // lookup never returns. Pre-setting the identifier skips it.
        #[cfg(target_os = "macos")]
        let _ = mac_notification_sys::set_application("com.apple.Terminal");

        Self
    }
}

#[async_trait]
impl NotifyAdapter for DesktopNotifyAdapter {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let title = title.to_string();
        let message = message.to_string();
        // show() is synchronous on macOS; run it on the blocking pool so a
        // wedged notification daemon cannot block a patrol.
        tokio::task::spawn_blocking(move || {
            let result = notify_rust::Notification::new()
                .summary(&title)
                .body(&message)
                .appname("panopticon")
                .show();
            match result {
                Ok(_) => tracing::debug!(%title, "desktop alert delivered"),
                Err(e) => tracing::warn!(%title, error = %e, "desktop alert failed"),
            }
        });
        Ok(())
    }
}
