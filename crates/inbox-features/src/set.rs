//! FeatureSet: ordered features, global offsets, and vector assembly.
//!
//! Per-feature bucket indices are always stable. Global indices (offset +
//! bucket) are only meaningful for one layout of the set: growth in an
//! earlier feature moves every later feature's offset. Rows that must share
//! a layout are encoded together with `compute_batch`, or kept as
//! `compute_pairs` output and laid out later with `assemble`. Weights that
//! outlive a layout are keyed by `(feature, bucket)`.

use inbox_core::config::{EncodingConfig, InboxConfig};
use inbox_core::errors::{FeatureError, InboxResult};
use inbox_core::models::{Contact, Message, User};
use tracing::{debug, info, warn};

use crate::bucket::FeatureBucketValuePair;
use crate::builder;
use crate::feature::Feature;
use crate::sparse::SparseVector;

/// The encoder for one model: features in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    features: Vec<Feature>,
    log_growth: bool,
}

impl FeatureSet {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            log_growth: true,
        }
    }

    /// Build from configuration, validating every definition.
    pub fn from_config(config: &EncodingConfig) -> InboxResult<Self> {
        let features = builder::build_features(&config.definitions())?;
        Ok(Self::new(features))
    }

    /// Build from the root config, honoring `observability.log_vocabulary_growth`.
    pub fn from_inbox_config(config: &InboxConfig) -> InboxResult<Self> {
        Ok(Self::from_config(&config.encoding)?
            .with_growth_logging(config.observability.log_vocabulary_growth))
    }

    /// Log vocabulary growth at info level (debug otherwise).
    pub fn with_growth_logging(mut self, enabled: bool) -> Self {
        self.log_growth = enabled;
        self
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name() == name)
    }

    pub fn feature_mut(&mut self, name: &str) -> Option<&mut Feature> {
        self.features.iter_mut().find(|f| f.name() == name)
    }

    /// Configure every feature for the user.
    pub fn configure(&mut self, user: &User) -> InboxResult<()> {
        for feature in &mut self.features {
            feature.configure(user)?;
        }
        debug!(user = %user.id, dimension = self.dimension(), "feature set configured");
        Ok(())
    }

    /// Pre-seed an address-book contact into every dynamic vocabulary in the
    /// set. Compounds own separate copies of their components, so those
    /// are seeded too.
    pub fn register_contact(&mut self, user: &User, contact: &Contact) -> InboxResult<()> {
        for feature in &mut self.features {
            feature.register_contact(user, contact)?;
        }
        Ok(())
    }

    /// Global bucket-index base per feature, from current bucket counts.
    pub fn offsets(&self) -> Vec<u32> {
        let mut next = 0u32;
        self.features
            .iter()
            .map(|f| {
                let offset = next;
                next += f.len() as u32;
                offset
            })
            .collect()
    }

    /// Total bucket count over all features.
    pub fn dimension(&self) -> usize {
        self.features.iter().map(Feature::len).sum()
    }

    /// Per-feature pairs for one message, in feature order.
    pub fn compute_pairs(
        &mut self,
        user: &User,
        message: &Message,
    ) -> InboxResult<Vec<Vec<FeatureBucketValuePair>>> {
        let mut all = Vec::with_capacity(self.features.len());
        for feature in &mut self.features {
            let before = feature.len();
            let pairs = feature.compute(user, message)?;
            let after = feature.len();
            if after > before {
                if self.log_growth {
                    info!(feature = %feature.name(), before, after, message = %message.id, "vocabulary grew");
                } else {
                    debug!(feature = %feature.name(), before, after, message = %message.id, "vocabulary grew");
                }
            }
            all.push(pairs);
        }
        Ok(all)
    }

    /// Encode one message. Offsets are taken after every feature has
    /// computed, so growth during this call is reflected in the result.
    pub fn compute(&mut self, user: &User, message: &Message) -> InboxResult<SparseVector> {
        let per_feature = self.compute_pairs(user, message)?;
        Ok(self.assemble(&per_feature))
    }

    /// Encode many messages. Every row is laid out with the offsets and
    /// dimension in effect after the last message, so a given feature bucket
    /// has the same global index in all rows of the batch.
    pub fn compute_batch(
        &mut self,
        user: &User,
        messages: &[Message],
    ) -> InboxResult<Vec<SparseVector>> {
        let rows = messages
            .iter()
            .map(|m| self.compute_pairs(user, m))
            .collect::<InboxResult<Vec<_>>>()?;
        Ok(rows.iter().map(|row| self.assemble(row)).collect())
    }

    /// Lay per-feature pairs out at the current offsets.
    pub fn assemble(&self, per_feature: &[Vec<FeatureBucketValuePair>]) -> SparseVector {
        let mut vector = SparseVector::new(self.dimension());
        for (pairs, offset) in per_feature.iter().zip(self.offsets()) {
            for pair in pairs {
                vector.push(offset + pair.bucket, pair.value);
            }
        }
        vector
    }

    /// Report the first difference from another set as a configuration
    /// mismatch. Never repairs.
    pub fn check_compatible(&self, other: &FeatureSet) -> Result<(), FeatureError> {
        if self.features.len() != other.features.len() {
            return Err(FeatureError::ConfigurationMismatch {
                feature: "*".to_string(),
                reason: format!(
                    "feature count {} vs {}",
                    self.features.len(),
                    other.features.len()
                ),
            });
        }
        for (a, b) in self.features.iter().zip(&other.features) {
            let reason = if a.name() != b.name() {
                Some(format!("name {:?} vs {:?}", a.name(), b.name()))
            } else {
                a.mismatch(b)
            };
            if let Some(reason) = reason {
                warn!(feature = %a.name(), reason = %reason, "feature set mismatch");
                return Err(FeatureError::ConfigurationMismatch {
                    feature: a.name().to_string(),
                    reason,
                });
            }
        }
        Ok(())
    }

    /// blake3 digest over names, metadata, and bucket sequences.
    /// Sets that compare equal have equal fingerprints.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for feature in &self.features {
            let meta = feature.meta();
            for field in [
                meta.name.as_str(),
                meta.description.as_str(),
                meta.display_format.as_str(),
                if meta.is_shared { "shared" } else { "per_user" },
            ] {
                hasher.update(field.as_bytes());
                hasher.update(&[0]);
            }
            for bucket in feature.buckets() {
                hasher.update(&bucket.index.to_le_bytes());
                hasher.update(bucket.name.as_bytes());
                hasher.update(&[0]);
            }
            hasher.update(&[0xff]);
        }
        hasher.finalize().to_hex().to_string()
    }

    /// Rebuild every feature's derived lookups after deserialization.
    pub fn restore(&mut self) -> Result<(), FeatureError> {
        self.features.iter_mut().try_for_each(Feature::restore)
    }
}
