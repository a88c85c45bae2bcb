//! Synthetic node identity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Edit-session identity of an action node
///
/// Shaped `"{prefix}_{n}"` where the prefix is the verb for root actions and
/// `"{parentKey}_{verb}"` for sub-actions. Never persisted with the script.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UiKey(String);

impl UiKey {
    /// Key as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UiKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UiKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Per-lineage key counters
///
/// Cloned along with the wrapper on every edit, so each lineage keeps
/// counting where its predecessor stopped.
#[derive(Debug, Clone, Default)]
pub struct KeyCounters {
    counters: im::HashMap<String, u64>,
}

impl KeyCounters {
    /// Generate the next key for a verb, optionally under a parent
    pub fn next_key(&mut self, verb: &str, parent: Option<&UiKey>) -> UiKey {
        let prefix = match parent {
            Some(parent) => format!("{parent}_{verb}"),
            None => verb.to_string(),
        };
        let n = match self.counters.get_mut(&prefix) {
            Some(count) => {
                *count += 1;
                *count
            }
            None => {
                self.counters.insert(prefix.clone(), 0);
                0
            }
        };
        UiKey(format!("{prefix}_{n}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_per_prefix() {
        let mut counters = KeyCounters::default();
        assert_eq!(counters.next_key("applyTheme", None).as_str(), "applyTheme_0");
        assert_eq!(counters.next_key("applyTheme", None).as_str(), "applyTheme_1");
        assert_eq!(counters.next_key("joinHubSite", None).as_str(), "joinHubSite_0");

        let parent = UiKey::from("createSPList_0");
        assert_eq!(
            counters.next_key("setTitle", Some(&parent)).as_str(),
            "createSPList_0_setTitle_0"
        );
    }

    #[test]
    fn clones_continue_independently() {
        let mut original = KeyCounters::default();
        original.next_key("a", None);

        let mut fork = original.clone();
        assert_eq!(fork.next_key("a", None).as_str(), "a_1");
        assert_eq!(original.next_key("a", None).as_str(), "a_1");
    }
}
