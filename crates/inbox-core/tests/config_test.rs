use inbox_core::config::*;
use inbox_core::models::{BinEdge, CategoryMatcher, NumericSource, RecipientPosition};

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = InboxConfig::from_toml("").unwrap();

    assert!(config.encoding.include_standard_features);
    assert!(config.encoding.features.is_empty());
    assert_eq!(config.observability.log_level, "info");
    assert!(!config.observability.json);
    assert!(config.observability.log_vocabulary_growth);

    let names: Vec<String> = config
        .encoding
        .definitions()
        .iter()
        .map(|d| d.name().to_string())
        .collect();
    assert_eq!(names.first().map(String::as_str), Some("Sender"));
    assert!(names.contains(&"SenderAndPosition".to_string()));
}

#[test]
fn config_loads_custom_features() {
    let toml = r#"
[encoding]
include_standard_features = false

[[encoding.features]]
kind = "numeric"
name = "Length"
source = "body_length"
bins = [5.0, 10.0, 100.0]

[[encoding.features]]
kind = "one_of_n"
name = "Position"
include_other = false

[[encoding.features.categories]]
name = "Cc"
matcher = { type = "user_position", value = "on_cc" }

[[encoding.features.categories]]
name = "Re"
matcher = { type = "subject_prefix", value = "RE:" }

[[encoding.features]]
kind = "compound"
name = "LengthByPosition"
first = "Length"
second = "Position"

[observability]
json = true
"#;
    let config = InboxConfig::from_toml(toml).unwrap();
    let defs = config.encoding.definitions();
    assert_eq!(defs.len(), 3);
    assert!(config.observability.json);
    assert_eq!(config.observability.log_level, "info");

    match &defs[0] {
        FeatureDefinition::Numeric {
            source,
            bins,
            edge,
            unbounded_above,
            ..
        } => {
            assert_eq!(*source, NumericSource::BodyLength);
            assert_eq!(bins, &vec![5.0, 10.0, 100.0]);
            assert_eq!(*edge, BinEdge::Inclusive);
            assert!(*unbounded_above);
        }
        other => panic!("expected numeric, got {other:?}"),
    }

    match &defs[1] {
        FeatureDefinition::OneOfN {
            categories,
            include_other,
            ..
        } => {
            assert!(!include_other);
            assert_eq!(
                categories[0].matcher,
                CategoryMatcher::UserPosition(RecipientPosition::OnCc)
            );
            assert_eq!(
                categories[1].matcher,
                CategoryMatcher::SubjectPrefix("RE:".to_string())
            );
        }
        other => panic!("expected one_of_n, got {other:?}"),
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = InboxConfig::from_toml("[encoding\nfeatures = 3").unwrap_err();
    assert!(matches!(err, inbox_core::errors::ConfigError::ParseError { .. }));
}

#[test]
fn config_serde_roundtrip() {
    let config = InboxConfig::default();
    let toml_str = config.to_toml().unwrap();
    let roundtripped = InboxConfig::from_toml(&toml_str).unwrap();
    assert_eq!(
        roundtripped.encoding.include_standard_features,
        config.encoding.include_standard_features
    );
    assert_eq!(
        roundtripped.observability.log_level,
        config.observability.log_level
    );
}

#[test]
fn standard_numeric_features_keep_their_edges() {
    let defs = defaults::standard_features();
    let edge_of = |wanted: &str| {
        defs.iter().find_map(|d| match d {
            FeatureDefinition::Numeric { name, edge, .. } if name == wanted => Some(*edge),
            _ => None,
        })
    };
    assert_eq!(edge_of("BodyLength"), Some(BinEdge::Inclusive));
    assert_eq!(edge_of("SubjectLength"), Some(BinEdge::Inclusive));
    assert_eq!(edge_of("RecipientCount"), Some(BinEdge::Exclusive));
    assert_eq!(edge_of("CcCount"), Some(BinEdge::Exclusive));
}
