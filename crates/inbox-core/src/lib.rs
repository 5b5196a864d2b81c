//! # inbox-core
//!
//! Foundation crate for the inbox reply-prediction encoder.
//! Defines the mail models, identity keys, feature selectors, errors,
//! config, and constants. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod identity;
pub mod models;

// Re-export the most commonly used types at the crate root.
pub use config::InboxConfig;
pub use errors::{InboxError, InboxResult};
pub use identity::IdentityKey;
pub use models::{Contact, Message, RecipientPosition, User, UserId};
