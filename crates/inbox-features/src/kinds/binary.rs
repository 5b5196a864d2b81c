use inbox_core::errors::FeatureError;
use inbox_core::models::{BinarySource, Message, User};
use serde::{Deserialize, Serialize};

use crate::bucket::{BucketList, BucketPayload, FeatureBucketValuePair};
use crate::feature::FeatureMeta;

/// Single-bucket feature driven by a boolean predicate.
///
/// The bucket is always reported, with weight 1.0 or 0.0, so the weight
/// vector keeps a fixed dimensionality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryFeature {
    pub meta: FeatureMeta,
    pub source: BinarySource,
    pub buckets: BucketList,
}

impl BinaryFeature {
    pub fn new(meta: FeatureMeta, source: BinarySource) -> Self {
        Self {
            meta,
            source,
            buckets: BucketList::new(),
        }
    }

    pub fn configure(&mut self) {
        self.buckets.clear();
        self.buckets
            .push(&self.meta.name, self.meta.name.clone(), BucketPayload::Unit);
    }

    pub fn compute(
        &self,
        user: &User,
        message: &Message,
    ) -> Result<Vec<FeatureBucketValuePair>, FeatureError> {
        if self.buckets.is_empty() {
            return Err(FeatureError::NotConfigured {
                feature: self.meta.name.clone(),
            });
        }
        let value = if self.source.evaluate(user, message) {
            1.0
        } else {
            0.0
        };
        Ok(vec![FeatureBucketValuePair::new(0, value)])
    }

    pub(crate) fn restore(&self) -> Result<(), FeatureError> {
        self.buckets.verify(&self.meta.name)?;
        if self.buckets.len() > 1 {
            return Err(FeatureError::CorruptSnapshot {
                feature: self.meta.name.clone(),
                reason: format!("binary feature holds {} buckets", self.buckets.len()),
            });
        }
        Ok(())
    }
}
