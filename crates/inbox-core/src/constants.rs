/// Inbox encoder version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Snapshot format version written by the feature-set persistence layer.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Name of the catch-all bucket appended to one-of-N features.
pub const OTHER_BUCKET_NAME: &str = "Other";

/// Display name of the per-user "unknown person" sentinel bucket.
pub const UNKNOWN_PERSON_NAME: &str = "Unknown person";

/// Display format applied when a feature definition does not supply one.
pub const DEFAULT_DISPLAY_FORMAT: &str = "{feature}={bucket}";

/// Environment variable read by the tracing setup.
pub const LOG_ENV_VAR: &str = "INBOX_LOG";
