//! Action verb identifier

use crate::error::ScriptError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Identifier of an action or sub-action type
///
/// Verbs are the stable external identifier of an action: they are persisted
/// in every action of a script and used to look schemas up. Comparison is
/// exact; [`Verb::eq_ignore_case`] backs the case-insensitive fallback lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Verb(String);

impl Verb {
    /// Create a verb without validation
    #[inline]
    #[must_use]
    pub fn new(verb: impl Into<String>) -> Self {
        Self(verb.into())
    }

    /// Verb as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison
    #[inline]
    #[must_use]
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.to_uppercase() == other.to_uppercase()
    }

    /// Consume into owned string
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for Verb {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ScriptError::InvalidVerb(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Verb {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Verb {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Verb {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Verb {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for Verb {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Verb {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_parse_rejects_blank() {
        assert!("".parse::<Verb>().is_err());
        assert!("   ".parse::<Verb>().is_err());
        assert_eq!("applyTheme".parse::<Verb>().unwrap(), "applyTheme");
    }

    #[test]
    fn verb_case_insensitive_compare() {
        let verb = Verb::new("joinHubSite");
        assert!(verb.eq_ignore_case("JOINHUBSITE"));
        assert!(verb.eq_ignore_case("joinhubsite"));
        assert!(!verb.eq_ignore_case("joinHub"));
    }

    #[test]
    fn verb_serializes_as_plain_string() {
        let verb = Verb::new("setSiteLogo");
        assert_eq!(serde_json::to_string(&verb).unwrap(), "\"setSiteLogo\"");
    }

    #[test]
    fn verb_borrows_as_str_for_map_lookup() {
        let mut map = std::collections::HashMap::new();
        map.insert(Verb::new("a"), 1);
        assert_eq!(map.get("a"), Some(&1));
    }
}
