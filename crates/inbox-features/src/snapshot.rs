//! Lossless persistence of a feature set's buckets.
//!
//! A trained weight vector is positionally addressed, so a reload must
//! reproduce every bucket (including vocabulary grown in earlier sessions)
//! at the same index before any further `compute`. Identity maps and
//! compound cell tables are not stored; they are rebuilt from payloads.

use std::path::Path;

use chrono::{DateTime, Utc};
use inbox_core::constants::SNAPSHOT_FORMAT_VERSION;
use inbox_core::errors::{FeatureError, InboxResult};
use inbox_observability::snapshot_span;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::feature::Feature;
use crate::set::FeatureSet;

/// Serialized form of a [`FeatureSet`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSetSnapshot {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    /// [`FeatureSet::fingerprint`] at capture time.
    pub fingerprint: String,
    pub features: Vec<Feature>,
}

impl FeatureSetSnapshot {
    pub fn capture(set: &FeatureSet) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            created_at: Utc::now(),
            fingerprint: set.fingerprint(),
            features: set.features().to_vec(),
        }
    }

    pub fn to_json(&self) -> InboxResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> InboxResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> InboxResult<()> {
        let span = snapshot_span!("save", self.features.len());
        let _guard = span.enter();
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), fingerprint = %self.fingerprint, "feature set saved");
        Ok(())
    }

    pub fn load(path: &Path) -> InboxResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Rebuild a live set, verifying format version, bucket invariants,
    /// and the stored fingerprint.
    pub fn into_feature_set(self) -> InboxResult<FeatureSet> {
        let span = snapshot_span!("restore", self.features.len());
        let _guard = span.enter();

        if self.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(FeatureError::CorruptSnapshot {
                feature: "*".to_string(),
                reason: format!(
                    "format version {} is not supported (expected {})",
                    self.format_version, SNAPSHOT_FORMAT_VERSION
                ),
            }
            .into());
        }

        let mut set = FeatureSet::new(self.features);
        set.restore()?;

        let actual = set.fingerprint();
        if actual != self.fingerprint {
            return Err(FeatureError::CorruptSnapshot {
                feature: "*".to_string(),
                reason: format!("fingerprint {actual} does not match stored {}", self.fingerprint),
            }
            .into());
        }
        info!(features = set.len(), dimension = set.dimension(), "feature set restored");
        Ok(set)
    }
}

impl FeatureSet {
    pub fn snapshot(&self) -> FeatureSetSnapshot {
        FeatureSetSnapshot::capture(self)
    }

    /// Write a snapshot to disk.
    pub fn save(&self, path: &Path) -> InboxResult<()> {
        self.snapshot().save(path)
    }

    /// Load and restore a set from disk.
    pub fn load(path: &Path) -> InboxResult<Self> {
        FeatureSetSnapshot::load(path)?.into_feature_set()
    }
}
