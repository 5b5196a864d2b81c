//! Cross-product combinator over two features.

use std::collections::HashMap;

use inbox_core::errors::FeatureError;
use inbox_core::models::{Message, User};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bucket::{BucketList, BucketPayload, FeatureBucketValuePair};
use crate::feature::{Feature, FeatureMeta};

/// Feature whose buckets are cells of `first × second`.
///
/// With two fixed-vocabulary components, `configure` enumerates every cell
/// up front in row-major order (outer loop over `first`). Otherwise cells are
/// allocated on first sight during `compute`. Cells are never reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundFeature {
    pub meta: FeatureMeta,
    pub first: Box<Feature>,
    pub second: Box<Feature>,
    pub buckets: BucketList,
    #[serde(skip)]
    cells: HashMap<(u32, u32), u32>,
}

impl CompoundFeature {
    pub fn new(meta: FeatureMeta, first: Feature, second: Feature) -> Self {
        Self {
            meta,
            first: Box::new(first),
            second: Box::new(second),
            buckets: BucketList::new(),
            cells: HashMap::new(),
        }
    }

    pub fn is_fixed_vocabulary(&self) -> bool {
        self.first.is_fixed_vocabulary() && self.second.is_fixed_vocabulary()
    }

    /// Compound bucket for a pair of component buckets, if allocated.
    pub fn cell(&self, bucket1: u32, bucket2: u32) -> Option<u32> {
        self.cells.get(&(bucket1, bucket2)).copied()
    }

    pub fn configure(&mut self, user: &User) -> Result<(), FeatureError> {
        self.first.configure(user)?;
        self.second.configure(user)?;

        if self.is_fixed_vocabulary() {
            self.buckets.clear();
            self.cells.clear();
            let n1 = self.first.len() as u32;
            let n2 = self.second.len() as u32;
            for b1 in 0..n1 {
                for b2 in 0..n2 {
                    self.allocate(b1, b2);
                }
            }
        }
        Ok(())
    }

    /// Cross product of both components' active pairs, weight `w1 * w2`.
    pub fn compute(
        &mut self,
        user: &User,
        message: &Message,
    ) -> Result<Vec<FeatureBucketValuePair>, FeatureError> {
        let left = self.first.compute(user, message)?;
        let right = self.second.compute(user, message)?;

        let mut pairs = Vec::with_capacity(left.len() * right.len());
        for a in &left {
            for b in &right {
                let bucket = match self.cell(a.bucket, b.bucket) {
                    Some(hit) => hit,
                    None => self.allocate(a.bucket, b.bucket),
                };
                pairs.push(FeatureBucketValuePair::new(bucket, a.value * b.value));
            }
        }
        Ok(pairs)
    }

    fn allocate(&mut self, bucket1: u32, bucket2: u32) -> u32 {
        let name = format!(
            "{} & {}",
            self.first.bucket_name(bucket1).unwrap_or("?"),
            self.second.bucket_name(bucket2).unwrap_or("?"),
        );
        let index = self.buckets.push(
            &self.meta.name,
            name,
            BucketPayload::Compound { bucket1, bucket2 },
        );
        self.cells.insert((bucket1, bucket2), index);
        debug!(feature = %self.meta.name, index, bucket1, bucket2, "compound cell allocated");
        index
    }

    pub(crate) fn restore(&mut self) -> Result<(), FeatureError> {
        self.first.restore()?;
        self.second.restore()?;
        self.buckets.verify(&self.meta.name)?;

        let corrupt = |reason: String| FeatureError::CorruptSnapshot {
            feature: self.meta.name.clone(),
            reason,
        };
        let mut cells = HashMap::with_capacity(self.buckets.len());
        for bucket in &self.buckets {
            let BucketPayload::Compound { bucket1, bucket2 } = bucket.payload else {
                return Err(corrupt(format!(
                    "bucket {} does not carry a compound payload",
                    bucket.index
                )));
            };
            if bucket1 as usize >= self.first.len() || bucket2 as usize >= self.second.len() {
                return Err(corrupt(format!(
                    "bucket {} references missing component cell ({bucket1}, {bucket2})",
                    bucket.index
                )));
            }
            if cells.insert((bucket1, bucket2), bucket.index).is_some() {
                return Err(corrupt(format!(
                    "cell ({bucket1}, {bucket2}) allocated twice"
                )));
            }
        }
        self.cells = cells;
        Ok(())
    }
}
