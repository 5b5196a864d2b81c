//! Build features from configuration definitions.

use std::collections::HashMap;

use inbox_core::config::FeatureDefinition;
use inbox_core::constants::DEFAULT_DISPLAY_FORMAT;
use inbox_core::errors::{ConfigError, InboxResult};

use crate::feature::{Feature, FeatureMeta};
use crate::kinds::{BinaryFeature, CompoundFeature, DynamicFeature, NumericFeature, OneOfNFeature};

/// Build every definition in order.
///
/// Compound definitions may only reference names defined earlier; each
/// compound gets its own copies of its components, which grow and persist
/// inside the compound.
pub fn build_features(definitions: &[FeatureDefinition]) -> InboxResult<Vec<Feature>> {
    let mut defined: HashMap<&str, &FeatureDefinition> = HashMap::new();
    let mut features = Vec::with_capacity(definitions.len());

    for def in definitions {
        let name = def.name();
        if name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "name".to_string(),
                message: "feature names must not be empty".to_string(),
            }
            .into());
        }
        if defined.contains_key(name) {
            return Err(ConfigError::DuplicateFeature {
                name: name.to_string(),
            }
            .into());
        }
        features.push(build_one(def, &defined)?);
        defined.insert(name, def);
    }
    Ok(features)
}

/// Build a single definition against already-defined names.
pub fn build_one(
    def: &FeatureDefinition,
    defined: &HashMap<&str, &FeatureDefinition>,
) -> InboxResult<Feature> {
    let feature = match def {
        FeatureDefinition::Binary {
            name,
            description,
            display_format,
            source,
        } => Feature::Binary(BinaryFeature::new(
            meta(name, description, display_format, true),
            *source,
        )),
        FeatureDefinition::Numeric {
            name,
            description,
            display_format,
            source,
            bins,
            edge,
            unbounded_above,
        } => Feature::NumericBinned(NumericFeature::new(
            meta(name, description, display_format, true),
            *source,
            bins.clone(),
            *edge,
            *unbounded_above,
        )?),
        FeatureDefinition::OneOfN {
            name,
            description,
            display_format,
            categories,
            include_other,
        } => Feature::OneOfN(OneOfNFeature::new(
            meta(name, description, display_format, true),
            categories.clone(),
            *include_other,
        )?),
        FeatureDefinition::Dynamic {
            name,
            description,
            display_format,
            source,
        } => Feature::Dynamic(DynamicFeature::new(
            meta(name, description, display_format, false),
            *source,
        )),
        FeatureDefinition::Compound {
            name,
            description,
            display_format,
            first,
            second,
        } => {
            let lookup = |component: &str| {
                defined
                    .get(component)
                    .copied()
                    .ok_or_else(|| ConfigError::UnknownFeature {
                        name: component.to_string(),
                    })
            };
            let first = build_one(lookup(first.as_str())?, defined)?;
            let second = build_one(lookup(second.as_str())?, defined)?;
            let shared = first.is_shared() && second.is_shared();
            Feature::Compound(CompoundFeature::new(
                meta(name, description, display_format, shared),
                first,
                second,
            ))
        }
    };
    Ok(feature)
}

fn meta(
    name: &str,
    description: &str,
    display_format: &Option<String>,
    is_shared: bool,
) -> FeatureMeta {
    FeatureMeta {
        name: name.to_string(),
        description: description.to_string(),
        display_format: display_format
            .clone()
            .unwrap_or_else(|| DEFAULT_DISPLAY_FORMAT.to_string()),
        is_shared,
    }
}
