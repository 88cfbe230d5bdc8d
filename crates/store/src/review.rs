// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External review/test/merge status file.
//!
//! One JSON object keyed by issue id. Specialists write rows; the
//! supervisor only heals orphans. Writers serialize through the same
//! advisory-lock discipline as the queue store.

use crate::{fsutil, lock, StateLayout, StoreError};
use pan_core::{IssueId, ReviewStatusRow};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct ReviewStatusStore {
    layout: StateLayout,
}

impl ReviewStatusStore {
    pub fn new(layout: StateLayout) -> Self {
        Self { layout }
    }

    pub fn load_all(&self) -> Result<BTreeMap<IssueId, ReviewStatusRow>, StoreError> {
        Ok(fsutil::load_json(&self.layout.review_status())?.unwrap_or_default())
    }

    pub fn save_all(&self, rows: &BTreeMap<IssueId, ReviewStatusRow>) -> Result<(), StoreError> {
        let path = self.layout.review_status();
        lock::with_file_lock(&path, || fsutil::write_json_atomic(&path, rows))
    }

    pub fn row(&self, issue_id: &IssueId) -> Result<Option<ReviewStatusRow>, StoreError> {
        Ok(self.load_all()?.remove(issue_id))
    }

    /// Upsert one row (specialist write path).
    pub fn set_row(&self, issue_id: IssueId, row: ReviewStatusRow) -> Result<(), StoreError> {
        let path = self.layout.review_status();
        lock::with_file_lock(&path, || {
            let mut rows: BTreeMap<IssueId, ReviewStatusRow> =
                fsutil::load_json(&path)?.unwrap_or_default();
            rows.insert(issue_id, row);
            fsutil::write_json_atomic(&path, &rows)
        })
    }
}

#[cfg(test)]
#[path = "review_tests.rs"]
mod tests;
