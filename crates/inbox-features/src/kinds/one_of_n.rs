use inbox_core::config::CategoryDefinition;
use inbox_core::constants::OTHER_BUCKET_NAME;
use inbox_core::errors::FeatureError;
use inbox_core::models::{Message, User};
use serde::{Deserialize, Serialize};

use crate::bucket::{BucketList, BucketPayload, FeatureBucketValuePair};
use crate::feature::FeatureMeta;

/// Fixed categorical feature: first matching category wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneOfNFeature {
    pub meta: FeatureMeta,
    pub categories: Vec<CategoryDefinition>,
    pub include_other: bool,
    pub buckets: BucketList,
}

impl OneOfNFeature {
    pub fn new(
        meta: FeatureMeta,
        categories: Vec<CategoryDefinition>,
        include_other: bool,
    ) -> Result<Self, FeatureError> {
        if categories.is_empty() {
            return Err(FeatureError::EmptyVocabulary { feature: meta.name });
        }
        Ok(Self {
            meta,
            categories,
            include_other,
            buckets: BucketList::new(),
        })
    }

    pub fn expected_len(&self) -> usize {
        self.categories.len() + usize::from(self.include_other)
    }

    pub fn configure(&mut self) {
        self.buckets.clear();
        for (ordinal, category) in self.categories.iter().enumerate() {
            self.buckets.push(
                &self.meta.name,
                category.name.clone(),
                BucketPayload::Category {
                    ordinal: Some(ordinal),
                },
            );
        }
        if self.include_other {
            self.buckets.push(
                &self.meta.name,
                OTHER_BUCKET_NAME,
                BucketPayload::Category { ordinal: None },
            );
        }
    }

    /// Ordered first-match search. With no match and no catch-all, the first
    /// bucket is reported at weight 0.0.
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
        let pair = match self
            .categories
            .iter()
            .position(|c| c.matcher.matches(user, message))
        {
            Some(i) => FeatureBucketValuePair::new(i as u32, 1.0),
            None if self.include_other => {
                FeatureBucketValuePair::new(self.categories.len() as u32, 1.0)
            }
            None => FeatureBucketValuePair::new(0, 0.0),
        };
        Ok(vec![pair])
    }

    pub(crate) fn restore(&self) -> Result<(), FeatureError> {
        self.buckets.verify(&self.meta.name)?;
        if !self.buckets.is_empty() && self.buckets.len() != self.expected_len() {
            return Err(FeatureError::CorruptSnapshot {
                feature: self.meta.name.clone(),
                reason: format!(
                    "{} buckets stored for {} categories",
                    self.buckets.len(),
                    self.expected_len()
                ),
            });
        }
        Ok(())
    }
}
