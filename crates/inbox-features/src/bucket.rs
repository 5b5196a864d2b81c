//! Buckets: the coordinates of the sparse feature vector.

use std::hash::{Hash, Hasher};

use inbox_core::errors::FeatureError;
use inbox_core::identity::IdentityKey;
use inbox_core::models::UserId;
use serde::{Deserialize, Serialize};

/// Role of an identity bucket within a user's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityRole {
    /// The per-user "unknown person" sentinel.
    Unknown,
    /// The mailbox owner.
    User,
    /// A contact discovered in mail or registered from an address book.
    Contact,
}

/// Kind-specific data attached to a bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BucketPayload {
    Unit,
    /// Numeric bin covering `(lower, upper]` or `[lower, upper)` depending on edge.
    Bin {
        lower: Option<f64>,
        upper: Option<f64>,
    },
    /// One-of-N category ordinal; `None` marks the catch-all.
    Category { ordinal: Option<usize> },
    /// Per-user identity; `keys` is every key the bucket was indexed under.
    Identity {
        user: UserId,
        role: IdentityRole,
        keys: Vec<IdentityKey>,
    },
    /// One cell of a cross product, by component bucket index.
    Compound { bucket1: u32, bucket2: u32 },
}

/// One discrete coordinate of a feature.
///
/// `owner` is the owning feature's name. It is used for display and
/// equality only; buckets never hold a reference to their feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    pub index: u32,
    pub name: String,
    pub payload: BucketPayload,
    pub owner: String,
}

/// Equality is `(owner, name, index)`; payload is ignored.
impl PartialEq for Bucket {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.name == other.name && self.owner == other.owner
    }
}

impl Eq for Bucket {}

impl Hash for Bucket {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.name.hash(state);
        self.index.hash(state);
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]={}", self.owner, self.index, self.name)
    }
}

/// One active coordinate returned by `compute`.
///
/// `bucket` is the index within the computing feature's bucket list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureBucketValuePair {
    pub bucket: u32,
    pub value: f64,
}

impl FeatureBucketValuePair {
    pub fn new(bucket: u32, value: f64) -> Self {
        Self { bucket, value }
    }
}

/// Append-only bucket sequence where `buckets[i].index == i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketList(Vec<Bucket>);

impl BucketList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a bucket and return its index.
    pub fn push(&mut self, owner: &str, name: impl Into<String>, payload: BucketPayload) -> u32 {
        let index = self.0.len() as u32;
        self.0.push(Bucket {
            index,
            name: name.into(),
            payload,
            owner: owner.to_string(),
        });
        index
    }

    /// Drop every bucket. Only static kinds call this, from `configure`.
    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }

    pub fn get(&self, index: u32) -> Option<&Bucket> {
        self.0.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bucket> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Bucket] {
        &self.0
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|b| b.name.as_str()).collect()
    }

    /// Check the positional invariant and ownership after deserialization.
    pub fn verify(&self, owner: &str) -> Result<(), FeatureError> {
        for (pos, bucket) in self.0.iter().enumerate() {
            if bucket.index as usize != pos {
                return Err(FeatureError::CorruptSnapshot {
                    feature: owner.to_string(),
                    reason: format!("bucket at position {pos} has index {}", bucket.index),
                });
            }
            if bucket.owner != owner {
                return Err(FeatureError::CorruptSnapshot {
                    feature: owner.to_string(),
                    reason: format!("bucket {pos} is owned by {}", bucket.owner),
                });
            }
        }
        Ok(())
    }
}

impl std::ops::Index<u32> for BucketList {
    type Output = Bucket;

    fn index(&self, index: u32) -> &Bucket {
        &self.0[index as usize]
    }
}

impl<'a> IntoIterator for &'a BucketList {
    type Item = &'a Bucket;
    type IntoIter = std::slice::Iter<'a, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
