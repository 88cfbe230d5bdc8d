// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lazy-behavior detection from terminal scrollback.
//!
//! Heuristic and advisory: the patterns come from configuration, are
//! compiled once at supervisor build time, and only ever cause a nudge
//! message, never a kill.

use regex::Regex;

/// The fixed anti-lazy nudge, sent followed by Enter.
pub const ANTI_LAZY_MESSAGE: &str = "You are an autonomous agent. Do not stop to ask for \
    permission or present options. Pick the best path forward and complete the task end to end, \
    then hand off for review.";

/// Compiled lazy-pattern table.
pub struct LazyDetector {
    patterns: Vec<Regex>,
}

impl LazyDetector {
    /// Compile the configured patterns. Invalid regexes are skipped with a
    /// warning so one bad entry cannot disable the rest of the table.
    pub fn from_patterns(patterns: &[String]) -> Self {
        let compiled = patterns
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!(pattern, error = %e, "skipping invalid lazy pattern");
                    None
                }
            })
            .collect();
        Self { patterns: compiled }
    }

    /// Whether the last non-empty line looks like a prompt waiting for
    /// input: it ends with `$`, `#`, `>`, or `?`.
    pub fn at_input_prompt(scrollback: &str) -> bool {
        scrollback
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .map(|line| {
                matches!(
                    line.trim_end().chars().last(),
                    Some('$') | Some('#') | Some('>') | Some('?')
                )
            })
            .unwrap_or(false)
    }

    /// Whether the scrollback matches the lazy heuristics: the session sits
    /// at an input prompt and any configured pattern matches.
    pub fn looks_lazy(&self, scrollback: &str) -> bool {
        if !Self::at_input_prompt(scrollback) {
            return false;
        }
        self.patterns.iter().any(|regex| regex.is_match(scrollback))
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

#[cfg(test)]
#[path = "lazy_tests.rs"]
mod tests;
