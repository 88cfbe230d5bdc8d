// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic file helpers.
//!
//! Every write goes to a temp file in the same directory, is fsync'd, and
//! renamed into place so readers never observe a partial write.

use crate::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a value as pretty JSON, atomically.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let data = serde_json::to_vec_pretty(value)?;
    write_bytes_atomic(path, &data)
}

/// Write a string, atomically.
pub fn write_string_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    write_bytes_atomic(path, contents.as_bytes())
}

fn write_bytes_atomic(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let tmp_path = path.with_extension("tmp");

    {
        let file = File::create(&tmp_path).map_err(|e| StoreError::io(&tmp_path, e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(data)
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| StoreError::io(&tmp_path, e.into_error()))?;
        file.sync_all().map_err(|e| StoreError::io(&tmp_path, e))?;
    }

    fs::rename(&tmp_path, path).map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

/// Load JSON from a file.
///
/// Returns `Ok(None)` when the file is absent and [`StoreError::Corrupt`]
/// when it exists but does not parse. Callers that only read treat corrupt
/// as absent; callers that would write back must skip the write so the
/// corrupt file survives for forensics.
///
/// Transient read errors are retried once; external writers rename into
/// place, so a second failure means something real.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let data = match read_with_retry(path) {
        Ok(Some(data)) => data,
        Ok(None) => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };

    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

fn read_with_retry(path: &Path) -> Result<Option<Vec<u8>>, std::io::Error> {
    match fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(first) => {
            tracing::debug!(path = %path.display(), error = %first, "read failed, retrying once");
            match fs::read(path) {
                Ok(data) => Ok(Some(data)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e),
            }
        }
    }
}

/// Load JSON, defaulting on absence or corruption.
///
/// Corruption is logged; the file itself is left untouched.
pub fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_json(path) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "treating unreadable state file as absent");
            T::default()
        }
    }
}

#[cfg(test)]
#[path = "fsutil_tests.rs"]
mod tests;
