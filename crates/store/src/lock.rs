// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded advisory file locks.
//!
//! Multi-writer files (queues, review status) serialize writers through a
//! sibling `.lock` file. The wait is bounded: on timeout the operation
//! proceeds anyway with a warning — last writer wins, which is acceptable
//! at patrol cadence. Temp+rename remains the invariant even when the lock
//! is not held.

use crate::StoreError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::time::{Duration, Instant};

const LOCK_RETRY: Duration = Duration::from_millis(50);
const LOCK_WAIT: Duration = Duration::from_secs(1);

fn lock_path(path: &Path) -> std::path::PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    path.with_file_name(name)
}

fn try_acquire(path: &Path) -> Option<File> {
    let lock_file = lock_path(path);
    if let Some(parent) = lock_file.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return None;
        }
    }

    let file = match OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_file)
    {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(path = %lock_file.display(), error = %e, "cannot open lock file");
            return None;
        }
    };

    let deadline = Instant::now() + LOCK_WAIT;
    loop {
        match file.try_lock_exclusive() {
            Ok(()) => return Some(file),
            Err(_) if Instant::now() < deadline => std::thread::sleep(LOCK_RETRY),
            Err(e) => {
                tracing::warn!(
                    path = %lock_file.display(),
                    error = %e,
                    "advisory lock timed out, proceeding unlocked"
                );
                return None;
            }
        }
    }
}

/// Run `f` while holding the advisory lock for `path`.
///
/// Lock acquisition failure is non-fatal; `f` still runs.
pub fn with_file_lock<T>(
    path: &Path,
    f: impl FnOnce() -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    let guard = try_acquire(path);
    let result = f();
    if let Some(file) = guard {
        let _ = fs2::FileExt::unlock(&file);
    }
    result
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
