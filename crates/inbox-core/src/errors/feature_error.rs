//! Feature configuration and encoding errors.

use super::error_code::{self, ErrorCode};

/// Errors raised by feature configuration, encoding, and persistence.
///
/// Vocabulary misses are not errors: dynamic and compound features
/// allocate a new bucket instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureError {
    #[error("feature {feature} computed before configure")]
    NotConfigured { feature: String },

    #[error("feature {feature} has not been configured for user {user}")]
    UserNotConfigured { feature: String, user: String },

    #[error("invalid bin configuration for {feature}: {reason}")]
    InvalidBinConfiguration { feature: String, reason: String },

    #[error("feature {feature} declares no categories")]
    EmptyVocabulary { feature: String },

    #[error("configuration mismatch on {feature}: {reason}")]
    ConfigurationMismatch { feature: String, reason: String },

    #[error("corrupt snapshot for {feature}: {reason}")]
    CorruptSnapshot { feature: String, reason: String },
}

impl ErrorCode for FeatureError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured { .. } | Self::UserNotConfigured { .. } => {
                error_code::NOT_CONFIGURED
            }
            Self::InvalidBinConfiguration { .. } => error_code::INVALID_BIN_CONFIGURATION,
            Self::EmptyVocabulary { .. } => error_code::EMPTY_VOCABULARY,
            Self::ConfigurationMismatch { .. } => error_code::CONFIGURATION_MISMATCH,
            Self::CorruptSnapshot { .. } => error_code::CORRUPT_SNAPSHOT,
        }
    }
}
