// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Model providers and the known-model catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Unconditionally enabled; fallback models come from here.
    Anthropic,
    OpenAi,
    Google,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::Google => "google",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed catalog of routable models.
///
/// Override values outside this table fail validation at config load.
pub(crate) const KNOWN_MODELS: [(&str, Provider); 8] = [
    ("claude-opus-4-1", Provider::Anthropic),
    ("claude-sonnet-4-5", Provider::Anthropic),
    ("claude-haiku-4-5", Provider::Anthropic),
    ("gpt-5", Provider::OpenAi),
    ("gpt-5-codex", Provider::OpenAi),
    ("gpt-5-mini", Provider::OpenAi),
    ("gemini-2.5-pro", Provider::Google),
    ("gemini-2.5-flash", Provider::Google),
];

/// Provider of a known model id; `None` for models outside the catalog.
pub(crate) fn provider_of(model: &str) -> Option<Provider> {
    KNOWN_MODELS
        .iter()
        .find(|(id, _)| *id == model)
        .map(|(_, provider)| *provider)
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
