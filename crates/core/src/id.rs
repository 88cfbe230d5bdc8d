// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes and id generation.
//!
//! Agent ids are derived from issue ids and are authoritative as stored in
//! the registry record. Callers holding a session name (`pan-<id>`) normalize
//! once at the boundary via [`AgentId::normalize`].

/// Trait for truncating identifiers to a short prefix.
pub trait ShortId {
    /// Returns a string slice truncated to at most `n` characters.
    fn short(&self, n: usize) -> &str;
}

impl ShortId for str {
    fn short(&self, n: usize) -> &str {
        if self.len() <= n {
            self
        } else {
            &self[..n]
        }
    }
}

/// Define a newtype ID wrapper around `String`.
///
/// Generates `new()`, `as_str()`, `into_string()`, `short()`, `Display`,
/// `From<String>`, `From<&str>`, `AsRef<str>`, `PartialEq<&str>`, and
/// `Borrow<str>` implementations.
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }

            /// Returns a string slice truncated to at most `n` characters.
            pub fn short(&self, n: usize) -> &str {
                $crate::id::ShortId::short(self.0.as_str(), n)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Stable identifier of a supervised agent, derived from its issue id.
    pub struct AgentId;
}

define_id! {
    /// Tracker issue id (e.g. `PAN-123`).
    pub struct IssueId;
}

define_id! {
    /// Unique id of a queue item.
    pub struct ItemId;
}

define_id! {
    /// Unique id of a handoff event.
    pub struct HandoffId;
}

define_id! {
    /// Name of a warm-pool specialist (`review`, `test`, `merge`, `plan`).
    pub struct SpecialistName;
}

/// Session name prefix for multiplexer sessions owned by panopticon.
pub const SESSION_PREFIX: &str = "pan-";

impl AgentId {
    /// Normalize a raw identifier that may carry the session prefix.
    ///
    /// The stored record's id is authoritative; this is the single boundary
    /// where `pan-<id>` session names collapse back to agent ids.
    pub fn normalize(raw: &str) -> Self {
        match raw.strip_prefix(SESSION_PREFIX) {
            Some(stripped) => Self::new(stripped),
            None => Self::new(raw),
        }
    }

    /// The multiplexer session name for this agent.
    pub fn session_name(&self) -> String {
        format!("{}{}", SESSION_PREFIX, self.0)
    }
}

impl SpecialistName {
    pub const REVIEW: &'static str = "review";
    pub const TEST: &'static str = "test";
    pub const MERGE: &'static str = "merge";
    pub const PLAN: &'static str = "plan";

    /// The default warm pool.
    pub fn well_known() -> Vec<SpecialistName> {
        [Self::REVIEW, Self::TEST, Self::MERGE, Self::PLAN]
            .into_iter()
            .map(SpecialistName::new)
            .collect()
    }

    pub fn agent_id(&self) -> AgentId {
        AgentId::new(self.as_str())
    }
}

/// Generates unique identifiers
pub trait IdGen: Clone + Send + Sync {
    fn next(&self) -> String;
}

/// UUID-based ID generator for production use
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Sequential ID generator for testing
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

#[cfg(any(test, feature = "test-support"))]
impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: std::sync::Arc::new(std::sync::atomic::AtomicU64::new(1)),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("id")
    }
}

#[cfg(any(test, feature = "test-support"))]
impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
