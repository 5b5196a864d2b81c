//! Per-user identity → bucket maps for dynamic-vocabulary features.
//!
//! Entries are created lazily and never removed. The maps are derived data:
//! every key a bucket is reachable by is also stored in that bucket's
//! payload, so a map can always be rebuilt from the bucket list.

use std::collections::HashMap;

use inbox_core::errors::FeatureError;
use inbox_core::identity::IdentityKey;
use inbox_core::models::{Contact, UserId};

use crate::bucket::{BucketList, BucketPayload, IdentityRole};

/// One user's identity map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserVocabulary {
    unknown: Option<u32>,
    own: Option<u32>,
    keys: HashMap<IdentityKey, u32>,
}

impl UserVocabulary {
    /// Bucket of the "unknown person" sentinel.
    pub fn unknown(&self) -> Option<u32> {
        self.unknown
    }

    /// Bucket of the user themself.
    pub fn own(&self) -> Option<u32> {
        self.own
    }

    /// Number of keys indexed.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn get(&self, key: &IdentityKey) -> Option<u32> {
        self.keys.get(key).copied()
    }

    /// Resolve a contact: display-name key first, then the first alias that hits.
    pub fn lookup(&self, contact: &Contact) -> Option<u32> {
        if let Some(hit) = contact.name_key().and_then(|k| self.get(&k)) {
            return Some(hit);
        }
        contact.alias_keys().iter().find_map(|k| self.get(k))
    }

    /// Index a bucket under every key. Existing keys keep their first bucket.
    pub fn index(&mut self, keys: &[IdentityKey], bucket: u32) {
        for key in keys {
            self.keys.entry(key.clone()).or_insert(bucket);
        }
    }

    pub(crate) fn set_role(&mut self, role: IdentityRole, bucket: u32) {
        match role {
            IdentityRole::Unknown => {
                self.unknown.get_or_insert(bucket);
            }
            IdentityRole::User => {
                self.own.get_or_insert(bucket);
            }
            IdentityRole::Contact => {}
        }
    }
}

/// Identity maps for every user of one dynamic feature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerUserVocabulary {
    users: HashMap<UserId, UserVocabulary>,
}

impl PerUserVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user: &UserId) -> Option<&UserVocabulary> {
        self.users.get(user)
    }

    pub fn get_mut(&mut self, user: &UserId) -> Option<&mut UserVocabulary> {
        self.users.get_mut(user)
    }

    /// Replace a user's map.
    pub fn insert(&mut self, user: UserId, vocabulary: UserVocabulary) {
        self.users.insert(user, vocabulary);
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Rebuild one user's map from the identity payloads in a bucket list.
    pub fn rebuild_user(buckets: &BucketList, user: &UserId) -> UserVocabulary {
        let mut vocab = UserVocabulary::default();
        for bucket in buckets {
            if let BucketPayload::Identity {
                user: owner,
                role,
                keys,
            } = &bucket.payload
            {
                if owner == user {
                    vocab.set_role(*role, bucket.index);
                    vocab.index(keys, bucket.index);
                }
            }
        }
        vocab
    }

    /// Rebuild every user's map. Fails on any non-identity payload.
    pub fn rebuild(buckets: &BucketList, feature: &str) -> Result<Self, FeatureError> {
        let mut users: HashMap<UserId, UserVocabulary> = HashMap::new();
        for bucket in buckets {
            match &bucket.payload {
                BucketPayload::Identity { user, role, keys } => {
                    let vocab = users.entry(user.clone()).or_default();
                    vocab.set_role(*role, bucket.index);
                    vocab.index(keys, bucket.index);
                }
                other => {
                    return Err(FeatureError::CorruptSnapshot {
                        feature: feature.to_string(),
                        reason: format!(
                            "bucket {} carries {other:?}, expected an identity payload",
                            bucket.index
                        ),
                    });
                }
            }
        }
        Ok(Self { users })
    }
}
