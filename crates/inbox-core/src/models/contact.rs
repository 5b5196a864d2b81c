use serde::{Deserialize, Serialize};

use crate::identity::IdentityKey;

/// A message participant: sender, To or Cc entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Display name from the header, if any.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Email aliases, in header order.
    #[serde(default)]
    pub addresses: Vec<String>,
}

impl Contact {
    /// Contact with a display name and a single address.
    pub fn named(display_name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            addresses: vec![address.into()],
        }
    }

    /// Contact known only by an address.
    pub fn address(address: impl Into<String>) -> Self {
        Self {
            display_name: None,
            addresses: vec![address.into()],
        }
    }

    /// Contact known only by a display name.
    pub fn display(display_name: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            addresses: Vec::new(),
        }
    }

    /// The display name when present and non-blank, else the first address.
    pub fn canonical_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.addresses.first().map(String::as_str))
    }

    /// Key for the canonical display name, if the contact has one.
    pub fn name_key(&self) -> Option<IdentityKey> {
        self.display_name.as_deref().and_then(IdentityKey::normalize)
    }

    /// Keys for every alias, deduplicated in header order.
    pub fn alias_keys(&self) -> Vec<IdentityKey> {
        let mut keys = Vec::with_capacity(self.addresses.len());
        for key in self.addresses.iter().filter_map(|a| IdentityKey::normalize(a)) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Name key first, then alias keys, deduplicated.
    pub fn identity_keys(&self) -> Vec<IdentityKey> {
        let mut keys: Vec<IdentityKey> = self.name_key().into_iter().collect();
        for key in self.alias_keys() {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// True when no key can be derived from the contact.
    pub fn is_anonymous(&self) -> bool {
        self.identity_keys().is_empty()
    }
}
