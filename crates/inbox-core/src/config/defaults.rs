//! The standard reply-prediction feature set.

use super::encoding_config::{CategoryDefinition, FeatureDefinition};
use crate::models::{
    BinEdge, BinarySource, CategoryMatcher, IdentitySource, NumericSource, RecipientPosition,
};

pub const BODY_LENGTH_BINS: [f64; 8] = [10.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0];
pub const SUBJECT_LENGTH_BINS: [f64; 5] = [5.0, 10.0, 20.0, 40.0, 80.0];
pub const RECIPIENT_COUNT_BINS: [f64; 5] = [2.0, 3.0, 5.0, 10.0, 20.0];
pub const CC_COUNT_BINS: [f64; 3] = [1.0, 2.0, 5.0];

pub const SUBJECT_PREFIXES: [&str; 3] = ["RE:", "FW:", "FWD:"];

/// Definitions in the order their buckets are laid out in the weight vector.
pub fn standard_features() -> Vec<FeatureDefinition> {
    vec![
        FeatureDefinition::Dynamic {
            name: "Sender".to_string(),
            description: "Who sent the message".to_string(),
            display_format: None,
            source: IdentitySource::Sender,
        },
        FeatureDefinition::Dynamic {
            name: "Recipients".to_string(),
            description: "Who else received the message".to_string(),
            display_format: None,
            source: IdentitySource::Recipients,
        },
        FeatureDefinition::OneOfN {
            name: "ToCcPosition".to_string(),
            description: "Where the user appears on the address lines".to_string(),
            display_format: None,
            categories: vec![
                CategoryDefinition {
                    name: "First on To".to_string(),
                    matcher: CategoryMatcher::UserPosition(RecipientPosition::FirstOnTo),
                },
                CategoryDefinition {
                    name: "On To".to_string(),
                    matcher: CategoryMatcher::UserPosition(RecipientPosition::OnTo),
                },
                CategoryDefinition {
                    name: "On Cc".to_string(),
                    matcher: CategoryMatcher::UserPosition(RecipientPosition::OnCc),
                },
            ],
            include_other: true,
        },
        FeatureDefinition::OneOfN {
            name: "SubjectPrefix".to_string(),
            description: "Reply or forward marker at the start of the subject".to_string(),
            display_format: None,
            categories: SUBJECT_PREFIXES
                .iter()
                .map(|p| CategoryDefinition {
                    name: (*p).to_string(),
                    matcher: CategoryMatcher::SubjectPrefix((*p).to_string()),
                })
                .collect(),
            include_other: true,
        },
        FeatureDefinition::Binary {
            name: "HasAttachments".to_string(),
            description: "Message carries at least one attachment".to_string(),
            display_format: None,
            source: BinarySource::HasAttachments,
        },
        FeatureDefinition::Binary {
            name: "FromUser".to_string(),
            description: "Message was sent by the user".to_string(),
            display_format: None,
            source: BinarySource::FromUser,
        },
        FeatureDefinition::Numeric {
            name: "BodyLength".to_string(),
            description: "Body length in characters".to_string(),
            display_format: None,
            source: NumericSource::BodyLength,
            bins: BODY_LENGTH_BINS.to_vec(),
            edge: BinEdge::Inclusive,
            unbounded_above: true,
        },
        FeatureDefinition::Numeric {
            name: "SubjectLength".to_string(),
            description: "Subject length in characters".to_string(),
            display_format: None,
            source: NumericSource::SubjectLength,
            bins: SUBJECT_LENGTH_BINS.to_vec(),
            edge: BinEdge::Inclusive,
            unbounded_above: true,
        },
        FeatureDefinition::Numeric {
            name: "RecipientCount".to_string(),
            description: "Number of To and Cc recipients".to_string(),
            display_format: None,
            source: NumericSource::RecipientCount,
            bins: RECIPIENT_COUNT_BINS.to_vec(),
            edge: BinEdge::Exclusive,
            unbounded_above: true,
        },
        FeatureDefinition::Numeric {
            name: "CcCount".to_string(),
            description: "Number of Cc recipients".to_string(),
            display_format: None,
            source: NumericSource::CcCount,
            bins: CC_COUNT_BINS.to_vec(),
            edge: BinEdge::Exclusive,
            unbounded_above: true,
        },
        FeatureDefinition::Compound {
            name: "SenderAndPosition".to_string(),
            description: "Sender crossed with the user's address-line position".to_string(),
            display_format: None,
            first: "Sender".to_string(),
            second: "ToCcPosition".to_string(),
        },
    ]
}
