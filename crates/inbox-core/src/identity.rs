use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized, case- and format-insensitive key used to resolve a contact
/// to its vocabulary bucket.
///
/// Display names and email aliases share one key space, so a single bucket
/// can be reached through several keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Normalize a raw display name or address.
    ///
    /// Trims, strips a `mailto:` prefix and surrounding angle brackets,
    /// lowercases, and collapses internal whitespace. Returns `None` when
    /// nothing is left.
    pub fn normalize(raw: &str) -> Option<Self> {
        let is_wrapper = |c: char| c == '<' || c == '>' || c.is_whitespace();

        let mut s = raw.trim_matches(is_wrapper);
        while s.get(..7).is_some_and(|p| p.eq_ignore_ascii_case("mailto:")) {
            s = s[7..].trim_matches(is_wrapper);
        }

        let collapsed = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if collapsed.is_empty() {
            None
        } else {
            Some(Self(collapsed))
        }
    }

    /// The normalized key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key looks like an email address rather than a display name.
    pub fn is_address(&self) -> bool {
        self.0.contains('@') && !self.0.contains(' ')
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IdentityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
