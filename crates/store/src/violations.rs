// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent FPP violation map (`fpp-violations.json`).
//!
//! Keyed by `agent:kind` so the at-most-one-unresolved invariant is
//! structural.

use crate::{fsutil, lock, StateLayout, StoreError};
use chrono::{DateTime, Utc};
use pan_core::{AgentId, FppViolation, ViolationKind};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ViolationStore {
    layout: StateLayout,
}

impl ViolationStore {
    pub fn new(layout: StateLayout) -> Self {
        Self { layout }
    }

    pub fn load_all(&self) -> Result<BTreeMap<String, FppViolation>, StoreError> {
        Ok(fsutil::load_json(&self.layout.violations())?.unwrap_or_default())
    }

    pub fn save_all(&self, violations: &BTreeMap<String, FppViolation>) -> Result<(), StoreError> {
        let path = self.layout.violations();
        lock::with_file_lock(&path, || fsutil::write_json_atomic(&path, violations))
    }

    /// The unresolved violation for `(agent, kind)`, if one exists.
    pub fn open_violation(
        &self,
        agent_id: &AgentId,
        kind: ViolationKind,
    ) -> Result<Option<FppViolation>, StoreError> {
        let key = FppViolation::key(agent_id, kind);
        Ok(self
            .load_all()?
            .remove(&key)
            .filter(|violation| !violation.resolved))
    }

    /// Insert or replace the violation for its `(agent, kind)` slot.
    pub fn upsert(&self, violation: FppViolation) -> Result<(), StoreError> {
        let path = self.layout.violations();
        lock::with_file_lock(&path, || {
            let mut violations: BTreeMap<String, FppViolation> =
                fsutil::load_json(&path)?.unwrap_or_default();
            let key = FppViolation::key(&violation.agent_id, violation.kind);
            violations.insert(key, violation);
            fsutil::write_json_atomic(&path, &violations)
        })
    }

    /// Mark the `(agent, kind)` violation resolved, if present.
    pub fn resolve(
        &self,
        agent_id: &AgentId,
        kind: ViolationKind,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let path = self.layout.violations();
        lock::with_file_lock(&path, || {
            let mut violations: BTreeMap<String, FppViolation> =
                fsutil::load_json(&path)?.unwrap_or_default();
            let key = FppViolation::key(agent_id, kind);
            match violations.get_mut(&key) {
                Some(violation) if !violation.resolved => {
                    violation.resolved = true;
                    violation.resolved_at = Some(now);
                    fsutil::write_json_atomic(&path, &violations)?;
                    Ok(true)
                }
                _ => Ok(false),
            }
        })
    }

    /// Purge resolved violations older than the retention window.
    pub fn clear_old(&self, retention: Duration, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let path = self.layout.violations();
        lock::with_file_lock(&path, || {
            let mut violations: BTreeMap<String, FppViolation> =
                fsutil::load_json(&path)?.unwrap_or_default();
            let before = violations.len();
            violations.retain(|_, violation| {
                if !violation.resolved {
                    return true;
                }
                let reference = violation.resolved_at.unwrap_or(violation.detected_at);
                match (now - reference).to_std() {
                    Ok(age) => age < retention,
                    Err(_) => true,
                }
            });
            let removed = before - violations.len();
            if removed > 0 {
                fsutil::write_json_atomic(&path, &violations)?;
            }
            Ok(removed)
        })
    }
}

#[cfg(test)]
#[path = "violations_tests.rs"]
mod tests;
