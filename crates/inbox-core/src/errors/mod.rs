pub mod config_error;
pub mod error_code;
pub mod feature_error;

pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use feature_error::FeatureError;

/// Top-level error for the inbox encoder.
#[derive(Debug, thiserror::Error)]
pub enum InboxError {
    #[error("feature error: {0}")]
    FeatureError(#[from] FeatureError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ErrorCode for InboxError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::FeatureError(e) => e.error_code(),
            Self::ConfigError(e) => e.error_code(),
            Self::SerializationError(_) => error_code::SERIALIZATION_ERROR,
            Self::Io(_) => error_code::IO_ERROR,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type InboxResult<T> = Result<T, InboxError>;
