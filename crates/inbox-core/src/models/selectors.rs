//! Closed selectors naming which part of a message a feature reads.
//!
//! Keeping these as plain enums (rather than closures) lets every feature
//! kind serialize alongside its buckets.

use serde::{Deserialize, Serialize};

use super::message::{Message, RecipientPosition};
use super::user::User;

/// Boolean predicate evaluated by a binary feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinarySource {
    HasAttachments,
    FromUser,
    SentOnlyToUser,
    UserOnCc,
}

impl BinarySource {
    pub fn evaluate(self, user: &User, message: &Message) -> bool {
        match self {
            Self::HasAttachments => message.has_attachments(),
            Self::FromUser => message.is_from(user),
            Self::SentOnlyToUser => message.sent_only_to(user),
            Self::UserOnCc => message.user_position(user) == Some(RecipientPosition::OnCc),
        }
    }
}

/// Numeric quantity binned by a numeric feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericSource {
    BodyLength,
    SubjectLength,
    RecipientCount,
    CcCount,
}

impl NumericSource {
    pub fn evaluate(self, message: &Message) -> f64 {
        match self {
            Self::BodyLength => message.body_length() as f64,
            Self::SubjectLength => message.subject_length() as f64,
            Self::RecipientCount => message.recipient_count() as f64,
            Self::CcCount => message.cc.len() as f64,
        }
    }
}

/// Comparison direction used when scanning bin upper-bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinEdge {
    /// First bound with `value <= bound`; boundary values fall in the lower bucket.
    #[default]
    Inclusive,
    /// First bound with `value < bound`; boundary values fall in the upper bucket.
    Exclusive,
}

impl BinEdge {
    pub fn admits(self, value: f64, bound: f64) -> bool {
        match self {
            Self::Inclusive => value <= bound,
            Self::Exclusive => value < bound,
        }
    }
}

/// Predicate for one category of a one-of-N feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CategoryMatcher {
    /// Subject starts with the prefix, ignoring leading whitespace. Case is
    /// folded with Unicode lowercase mapping.
    SubjectPrefix(String),
    /// The user appears at this position on the address lines.
    UserPosition(RecipientPosition),
}

impl CategoryMatcher {
    pub fn matches(&self, user: &User, message: &Message) -> bool {
        match self {
            Self::SubjectPrefix(prefix) => {
                let mut subject = message
                    .subject
                    .trim_start()
                    .chars()
                    .flat_map(char::to_lowercase);
                prefix
                    .chars()
                    .flat_map(char::to_lowercase)
                    .all(|p| subject.next() == Some(p))
            }
            Self::UserPosition(position) => message.user_position(user) == Some(*position),
        }
    }
}

/// Which contacts a dynamic-vocabulary feature resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    /// The single sender; one active bucket.
    Sender,
    /// Every To and Cc recipient; weights split evenly.
    Recipients,
}
