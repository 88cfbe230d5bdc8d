// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Preset model tables, one default model per work type.

use pan_core::WorkType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Mid-tier models for routine work, frontier models where it pays off.
    #[default]
    Balanced,
    /// Frontier models everywhere.
    Quality,
    /// Small models everywhere; for burn-down work and demos.
    Thrifty,
}

impl Preset {
    /// Default model for a work type under this preset.
    pub fn model_for(self, work_type: WorkType) -> &'static str {
        use WorkType::*;
        match self {
            Preset::Balanced => match work_type {
                IssueExploration => "claude-sonnet-4-5",
                IssueImplementation => "claude-opus-4-1",
                SpecialistReview => "gpt-5-codex",
                SpecialistTest => "claude-sonnet-4-5",
                SpecialistMerge => "claude-sonnet-4-5",
                SpecialistPlan => "claude-opus-4-1",
                SubagentBash => "claude-haiku-4-5",
                SubagentSearch => "gemini-2.5-flash",
                CliQuickCommand => "claude-haiku-4-5",
            },
            Preset::Quality => match work_type {
                IssueExploration => "claude-opus-4-1",
                IssueImplementation => "claude-opus-4-1",
                SpecialistReview => "gpt-5",
                SpecialistTest => "claude-opus-4-1",
                SpecialistMerge => "claude-sonnet-4-5",
                SpecialistPlan => "claude-opus-4-1",
                SubagentBash => "claude-sonnet-4-5",
                SubagentSearch => "gemini-2.5-pro",
                CliQuickCommand => "claude-sonnet-4-5",
            },
            Preset::Thrifty => match work_type {
                IssueExploration => "claude-haiku-4-5",
                IssueImplementation => "claude-sonnet-4-5",
                SpecialistReview => "gpt-5-mini",
                SpecialistTest => "claude-haiku-4-5",
                SpecialistMerge => "claude-haiku-4-5",
                SpecialistPlan => "claude-sonnet-4-5",
                SubagentBash => "claude-haiku-4-5",
                SubagentSearch => "gemini-2.5-flash",
                CliQuickCommand => "claude-haiku-4-5",
            },
        }
    }

    /// Always-available substitute used when a model's provider is not
    /// credentialed. Anthropic by construction.
    pub fn fallback_for(self, work_type: WorkType) -> &'static str {
        use WorkType::*;
        match self {
            Preset::Thrifty => "claude-haiku-4-5",
            Preset::Balanced | Preset::Quality => match work_type {
                SubagentBash | SubagentSearch | CliQuickCommand => "claude-haiku-4-5",
                _ => "claude-sonnet-4-5",
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Balanced => write!(f, "balanced"),
            Self::Quality => write!(f, "quality"),
            Self::Thrifty => write!(f, "thrifty"),
        }
    }
}

#[cfg(test)]
#[path = "preset_tests.rs"]
mod tests;
