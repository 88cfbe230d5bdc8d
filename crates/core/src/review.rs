// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External review/test/merge status rows.
//!
//! `review-status.json` maps issue id → row. Specialists write rows; the
//! supervisor's only mutation is orphan healing (`reviewing`/`testing`
//! downgraded to `pending` when the owning specialist is not active).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Reviewing,
    Passed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pending,
    Testing,
    Passed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStatus {
    Pending,
    Merging,
    Merged,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewStatusRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_status: Option<ReviewStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_status: Option<TestStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_status: Option<MergeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_for_merge: Option<bool>,
}

impl ReviewStatusRow {
    /// Whether the issue has been handed off into the review pipeline.
    ///
    /// Failed review/test rows do not count — the agent is expected to act
    /// on failures, so lazy nudges stay enabled for them.
    pub fn in_review_pipeline(&self) -> bool {
        matches!(
            self.review_status,
            Some(ReviewStatus::Reviewing) | Some(ReviewStatus::Passed)
        ) || matches!(
            self.test_status,
            Some(TestStatus::Testing) | Some(TestStatus::Passed)
        ) || self.merge_status.is_some()
            || self.ready_for_merge == Some(true)
    }
}

#[cfg(test)]
#[path = "review_tests.rs"]
mod tests;
