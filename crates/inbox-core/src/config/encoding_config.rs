use serde::{Deserialize, Serialize};

use crate::models::{BinEdge, BinarySource, CategoryMatcher, IdentitySource, NumericSource};

/// Feature-set configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// Prepend the standard reply-prediction features.
    pub include_standard_features: bool,
    /// Additional feature definitions, in declaration order.
    pub features: Vec<FeatureDefinition>,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            include_standard_features: true,
            features: Vec::new(),
        }
    }
}

impl EncodingConfig {
    /// Effective definitions: standard set (if enabled) followed by custom ones.
    pub fn definitions(&self) -> Vec<FeatureDefinition> {
        let mut defs = if self.include_standard_features {
            super::defaults::standard_features()
        } else {
            Vec::new()
        };
        defs.extend(self.features.iter().cloned());
        defs
    }
}

/// One named category of a one-of-N feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub name: String,
    pub matcher: CategoryMatcher,
}

/// Declarative description of a single feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureDefinition {
    Binary {
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        display_format: Option<String>,
        source: BinarySource,
    },
    Numeric {
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        display_format: Option<String>,
        source: NumericSource,
        bins: Vec<f64>,
        #[serde(default)]
        edge: BinEdge,
        #[serde(default = "default_true")]
        unbounded_above: bool,
    },
    OneOfN {
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        display_format: Option<String>,
        categories: Vec<CategoryDefinition>,
        #[serde(default = "default_true")]
        include_other: bool,
    },
    Dynamic {
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        display_format: Option<String>,
        source: IdentitySource,
    },
    Compound {
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        display_format: Option<String>,
        /// Name of an earlier definition.
        first: String,
        /// Name of an earlier definition.
        second: String,
    },
}

fn default_true() -> bool {
    true
}

impl FeatureDefinition {
    pub fn name(&self) -> &str {
        match self {
            Self::Binary { name, .. }
            | Self::Numeric { name, .. }
            | Self::OneOfN { name, .. }
            | Self::Dynamic { name, .. }
            | Self::Compound { name, .. } => name,
        }
    }
}
