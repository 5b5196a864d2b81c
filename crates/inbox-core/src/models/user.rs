use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::IdentityKey;

/// Identifier of a mailbox owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The mailbox owner whose messages are being encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// The owner's display name as it appears in headers.
    pub display_name: String,
    /// Every address the owner sends or receives mail under.
    #[serde(default)]
    pub addresses: Vec<String>,
}

impl User {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            display_name: display_name.into(),
            addresses: Vec::new(),
        }
    }

    /// Builder-style alias registration.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.addresses.push(address.into());
        self
    }

    /// Display-name key first, then each address key, deduplicated in order.
    pub fn identity_keys(&self) -> Vec<IdentityKey> {
        let mut keys: Vec<IdentityKey> = Vec::with_capacity(self.addresses.len() + 1);
        let candidates = std::iter::once(self.display_name.as_str())
            .chain(self.addresses.iter().map(String::as_str));
        for key in candidates.filter_map(IdentityKey::normalize) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Whether any of the owner's keys matches the given key.
    pub fn owns_key(&self, key: &IdentityKey) -> bool {
        self.identity_keys().iter().any(|k| k == key)
    }
}
