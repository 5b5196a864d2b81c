//! The uniform feature contract over every kind.

use std::hash::{Hash, Hasher};

use inbox_core::constants::DEFAULT_DISPLAY_FORMAT;
use inbox_core::errors::FeatureError;
use inbox_core::models::{Contact, Message, User};
use inbox_observability::{compute_span, configure_span};
use serde::{Deserialize, Serialize};

use crate::bucket::{BucketList, FeatureBucketValuePair};
use crate::kinds::{BinaryFeature, CompoundFeature, DynamicFeature, NumericFeature, OneOfNFeature};

/// Descriptive metadata shared by every feature kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureMeta {
    pub name: String,
    pub description: String,
    /// Template for bucket display; `{feature}` and `{bucket}` are substituted.
    pub display_format: String,
    /// Whether the vocabulary is common to all users.
    pub is_shared: bool,
}

impl FeatureMeta {
    pub fn shared(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            display_format: DEFAULT_DISPLAY_FORMAT.to_string(),
            is_shared: true,
        }
    }

    pub fn per_user(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            is_shared: false,
            ..Self::shared(name, description)
        }
    }

    pub fn with_display_format(mut self, format: impl Into<String>) -> Self {
        self.display_format = format.into();
        self
    }
}

/// A named encoder producing one or more bucket activations per message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feature {
    Binary(BinaryFeature),
    NumericBinned(NumericFeature),
    OneOfN(OneOfNFeature),
    Dynamic(DynamicFeature),
    Compound(CompoundFeature),
}

impl Feature {
    pub fn meta(&self) -> &FeatureMeta {
        match self {
            Self::Binary(f) => &f.meta,
            Self::NumericBinned(f) => &f.meta,
            Self::OneOfN(f) => &f.meta,
            Self::Dynamic(f) => &f.meta,
            Self::Compound(f) => &f.meta,
        }
    }

    pub fn name(&self) -> &str {
        &self.meta().name
    }

    pub fn is_shared(&self) -> bool {
        self.meta().is_shared
    }

    pub fn buckets(&self) -> &BucketList {
        match self {
            Self::Binary(f) => &f.buckets,
            Self::NumericBinned(f) => &f.buckets,
            Self::OneOfN(f) => &f.buckets,
            Self::Dynamic(f) => &f.buckets,
            Self::Compound(f) => &f.buckets,
        }
    }

    pub fn len(&self) -> usize {
        self.buckets().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets().is_empty()
    }

    pub fn bucket_name(&self, index: u32) -> Option<&str> {
        self.buckets().get(index).map(|b| b.name.as_str())
    }

    /// Whether the vocabulary is fully determined by static parameters.
    pub fn is_fixed_vocabulary(&self) -> bool {
        match self {
            Self::Binary(_) | Self::NumericBinned(_) | Self::OneOfN(_) => true,
            Self::Dynamic(_) => false,
            Self::Compound(f) => f.is_fixed_vocabulary(),
        }
    }

    /// (Re)populate buckets. Idempotent for fixed vocabularies; for dynamic
    /// kinds this replaces the user's identity map without renumbering.
    pub fn configure(&mut self, user: &User) -> Result<(), FeatureError> {
        let span = configure_span!(self.name(), user.id);
        let _guard = span.enter();
        match self {
            Self::Binary(f) => f.configure(),
            Self::NumericBinned(f) => f.configure()?,
            Self::OneOfN(f) => f.configure(),
            Self::Dynamic(f) => f.configure(user),
            Self::Compound(f) => f.configure(user)?,
        }
        Ok(())
    }

    /// Active buckets for a message. Dynamic and compound kinds may append
    /// buckets; existing indices never change.
    pub fn compute(
        &mut self,
        user: &User,
        message: &Message,
    ) -> Result<Vec<FeatureBucketValuePair>, FeatureError> {
        let span = compute_span!(self.name(), message.id);
        let _guard = span.enter();
        match self {
            Self::Binary(f) => f.compute(user, message),
            Self::NumericBinned(f) => f.compute(message),
            Self::OneOfN(f) => f.compute(user, message),
            Self::Dynamic(f) => f.compute(user, message),
            Self::Compound(f) => f.compute(user, message),
        }
    }

    /// Display string for a bucket using the feature's display format.
    pub fn display_bucket(&self, index: u32) -> Option<String> {
        let bucket = self.buckets().get(index)?;
        Some(
            self.meta()
                .display_format
                .replace("{feature}", self.name())
                .replace("{bucket}", &bucket.name),
        )
    }

    /// Pre-seed an address-book contact into every dynamic vocabulary this
    /// feature holds, including the private components of a compound.
    /// Fixed-vocabulary kinds ignore the call.
    pub fn register_contact(&mut self, user: &User, contact: &Contact) -> Result<(), FeatureError> {
        match self {
            Self::Dynamic(f) => f.register_contact(user, contact).map(|_| ()),
            Self::Compound(f) => {
                f.first.register_contact(user, contact)?;
                f.second.register_contact(user, contact)
            }
            Self::Binary(_) | Self::NumericBinned(_) | Self::OneOfN(_) => Ok(()),
        }
    }

    /// Rebuild derived lookup tables after deserialization and verify the
    /// bucket invariants.
    pub fn restore(&mut self) -> Result<(), FeatureError> {
        match self {
            Self::Binary(f) => f.restore(),
            Self::NumericBinned(f) => f.restore(),
            Self::OneOfN(f) => f.restore(),
            Self::Dynamic(f) => f.restore(),
            Self::Compound(f) => f.restore(),
        }
    }

    /// Describe the first difference from `other`, if any.
    pub fn mismatch(&self, other: &Feature) -> Option<String> {
        let (a, b) = (self.meta(), other.meta());
        if a.is_shared != b.is_shared {
            return Some(format!("is_shared {} vs {}", a.is_shared, b.is_shared));
        }
        if a.description != b.description {
            return Some(format!("description {:?} vs {:?}", a.description, b.description));
        }
        if a.display_format != b.display_format {
            return Some(format!(
                "display format {:?} vs {:?}",
                a.display_format, b.display_format
            ));
        }
        if self.len() != other.len() {
            return Some(format!("bucket count {} vs {}", self.len(), other.len()));
        }
        self.buckets()
            .iter()
            .zip(other.buckets().iter())
            .find(|(x, y)| x != y)
            .map(|(x, y)| format!("bucket {} is {x} vs {y}", x.index))
    }
}

/// Equality over `(is_shared, description, display_format, buckets)`, so two
/// independently trained features that enumerated the same vocabulary in
/// the same order compare equal.
impl PartialEq for Feature {
    fn eq(&self, other: &Self) -> bool {
        self.mismatch(other).is_none()
    }
}

impl Eq for Feature {}

/// Hashes the same fields `mismatch` compares.
impl Hash for Feature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let meta = self.meta();
        meta.is_shared.hash(state);
        meta.description.hash(state);
        meta.display_format.hash(state);
        self.buckets().hash(state);
    }
}
