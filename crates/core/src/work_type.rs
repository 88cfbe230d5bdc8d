// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Closed set of work-type identifiers used for model routing.
//!
//! Unknown identifiers fail fast at resolution time; there is no catch-all
//! variant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkTypeError {
    #[error("unknown work type: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorkType {
    IssueExploration,
    IssueImplementation,
    SpecialistReview,
    SpecialistTest,
    SpecialistMerge,
    SpecialistPlan,
    SubagentBash,
    SubagentSearch,
    CliQuickCommand,
}

impl WorkType {
    pub const ALL: [WorkType; 9] = [
        WorkType::IssueExploration,
        WorkType::IssueImplementation,
        WorkType::SpecialistReview,
        WorkType::SpecialistTest,
        WorkType::SpecialistMerge,
        WorkType::SpecialistPlan,
        WorkType::SubagentBash,
        WorkType::SubagentSearch,
        WorkType::CliQuickCommand,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::IssueExploration => "issue-agent:exploration",
            Self::IssueImplementation => "issue-agent:implementation",
            Self::SpecialistReview => "specialist-review-agent",
            Self::SpecialistTest => "specialist-test-agent",
            Self::SpecialistMerge => "specialist-merge-agent",
            Self::SpecialistPlan => "specialist-plan-agent",
            Self::SubagentBash => "subagent:bash",
            Self::SubagentSearch => "subagent:search",
            Self::CliQuickCommand => "cli:quick-command",
        }
    }
}

impl FromStr for WorkType {
    type Err = WorkTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|wt| wt.as_str() == s)
            .ok_or_else(|| WorkTypeError::Unknown(s.to_string()))
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WorkType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WorkType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "work_type_tests.rs"]
mod tests;
