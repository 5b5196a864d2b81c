use inbox_core::errors::FeatureError;
use inbox_core::models::{BinEdge, Message, NumericSource};
use serde::{Deserialize, Serialize};

use crate::bucket::{BucketList, BucketPayload, FeatureBucketValuePair};
use crate::feature::FeatureMeta;

/// Numeric value binned by ascending upper-bounds.
///
/// The active bucket is the first bound admitted by `edge`. Values above
/// every bound land in the overflow bucket when `unbounded_above`, else in
/// the last bound's bucket. NaN never matches a bound and takes the same path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericFeature {
    pub meta: FeatureMeta,
    pub source: NumericSource,
    pub bins: Vec<f64>,
    pub edge: BinEdge,
    pub unbounded_above: bool,
    pub buckets: BucketList,
}

impl NumericFeature {
    pub fn new(
        meta: FeatureMeta,
        source: NumericSource,
        bins: Vec<f64>,
        edge: BinEdge,
        unbounded_above: bool,
    ) -> Result<Self, FeatureError> {
        validate_bins(&meta.name, &bins)?;
        Ok(Self {
            meta,
            source,
            bins,
            edge,
            unbounded_above,
            buckets: BucketList::new(),
        })
    }

    /// Number of buckets `configure` allocates.
    pub fn expected_len(&self) -> usize {
        self.bins.len() + usize::from(self.unbounded_above)
    }

    pub fn configure(&mut self) -> Result<(), FeatureError> {
        validate_bins(&self.meta.name, &self.bins)?;
        self.buckets.clear();
        for (name, lower, upper) in bin_labels(&self.bins, self.edge, self.unbounded_above) {
            self.buckets
                .push(&self.meta.name, name, BucketPayload::Bin { lower, upper });
        }
        Ok(())
    }

    /// Index of the bucket a raw value falls into. Requires a configured feature.
    pub fn bucket_for(&self, value: f64) -> Option<u32> {
        if self.buckets.is_empty() {
            return None;
        }
        let idx = self
            .bins
            .iter()
            .position(|bound| self.edge.admits(value, *bound))
            .unwrap_or(self.buckets.len() - 1);
        Some(idx as u32)
    }

    pub fn compute(&self, message: &Message) -> Result<Vec<FeatureBucketValuePair>, FeatureError> {
        let value = self.source.evaluate(message);
        let bucket = self
            .bucket_for(value)
            .ok_or_else(|| FeatureError::NotConfigured {
                feature: self.meta.name.clone(),
            })?;
        Ok(vec![FeatureBucketValuePair::new(bucket, 1.0)])
    }

    pub(crate) fn restore(&self) -> Result<(), FeatureError> {
        validate_bins(&self.meta.name, &self.bins)?;
        self.buckets.verify(&self.meta.name)?;
        if !self.buckets.is_empty() && self.buckets.len() != self.expected_len() {
            return Err(FeatureError::CorruptSnapshot {
                feature: self.meta.name.clone(),
                reason: format!(
                    "{} buckets stored for {} expected",
                    self.buckets.len(),
                    self.expected_len()
                ),
            });
        }
        Ok(())
    }
}

/// Bins must be non-empty, finite, and strictly ascending.
pub fn validate_bins(feature: &str, bins: &[f64]) -> Result<(), FeatureError> {
    let invalid = |reason: String| FeatureError::InvalidBinConfiguration {
        feature: feature.to_string(),
        reason,
    };
    if bins.is_empty() {
        return Err(invalid("no bin thresholds".to_string()));
    }
    if let Some(bad) = bins.iter().find(|b| !b.is_finite()) {
        return Err(invalid(format!("threshold {bad} is not finite")));
    }
    if let Some(w) = bins.windows(2).find(|w| w[0] >= w[1]) {
        return Err(invalid(format!(
            "thresholds must be ascending, found {} then {}",
            w[0], w[1]
        )));
    }
    Ok(())
}

/// Bucket labels with their `(lower, upper)` bounds.
///
/// Integral inclusive bins `[5, 10, 100]` label as `5`, `6-10`, `11-100`, `>100`.
/// Integral exclusive bins label as `<5`, `5-9`, `10-99`, `>=100`.
pub fn bin_labels(
    bins: &[f64],
    edge: BinEdge,
    unbounded_above: bool,
) -> Vec<(String, Option<f64>, Option<f64>)> {
    let mut labels = Vec::with_capacity(bins.len() + 1);
    for (i, &upper) in bins.iter().enumerate() {
        let lower = i.checked_sub(1).map(|p| bins[p]);
        let name = match (edge, lower) {
            (BinEdge::Inclusive, None) => fmt_bound(upper),
            (BinEdge::Exclusive, None) => format!("<{}", fmt_bound(upper)),
            (BinEdge::Inclusive, Some(lo)) if integral(lo) && integral(upper) => {
                range_label(lo + 1.0, upper)
            }
            (BinEdge::Exclusive, Some(lo)) if integral(lo) && integral(upper) => {
                range_label(lo, upper - 1.0)
            }
            (BinEdge::Inclusive, Some(lo)) => {
                format!("({}, {}]", fmt_bound(lo), fmt_bound(upper))
            }
            (BinEdge::Exclusive, Some(lo)) => {
                format!("[{}, {})", fmt_bound(lo), fmt_bound(upper))
            }
        };
        labels.push((name, lower, Some(upper)));
    }
    if unbounded_above {
        if let Some(&last) = bins.last() {
            let name = match edge {
                BinEdge::Inclusive => format!(">{}", fmt_bound(last)),
                BinEdge::Exclusive => format!(">={}", fmt_bound(last)),
            };
            labels.push((name, Some(last), None));
        }
    }
    labels
}

fn range_label(lo: f64, hi: f64) -> String {
    if lo >= hi {
        fmt_bound(hi)
    } else {
        format!("{}-{}", fmt_bound(lo), fmt_bound(hi))
    }
}

fn integral(v: f64) -> bool {
    v.fract() == 0.0 && v.abs() < 1e15
}

fn fmt_bound(v: f64) -> String {
    if integral(v) {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
