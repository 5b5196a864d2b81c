//! Test fixture loader for inbox mailbox datasets.
//!
//! Provides typed deserialization of the fixture JSON files plus builders
//! for ad-hoc messages in tests across crates.

use chrono::{TimeZone, Utc};
use inbox_core::models::{Contact, Message, User};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;

/// Root directory of this crate's fixture files.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// A user's mailbox: the owner plus their messages in arrival order.
#[derive(Debug, Clone, Deserialize)]
pub struct Mailbox {
    pub user: User,
    pub messages: Vec<Message>,
}

/// Load a mailbox from `mailboxes/<name>.json`.
pub fn load_mailbox(name: &str) -> Mailbox {
    load_fixture(&format!("mailboxes/{name}.json"))
}

/// The default test user.
pub fn carol() -> User {
    User::new("carol", "Carol Jones")
        .with_address("carol@example.com")
        .with_address("cjones@example.org")
}

/// Builder for ad-hoc test messages.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            message: Message {
                id: id.to_string(),
                subject: String::new(),
                body: String::new(),
                sender: Contact::default(),
                to: Vec::new(),
                cc: Vec::new(),
                attachment_count: 0,
                sent_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            },
        }
    }

    pub fn from(mut self, sender: Contact) -> Self {
        self.message.sender = sender;
        self
    }

    pub fn to(mut self, contact: Contact) -> Self {
        self.message.to.push(contact);
        self
    }

    pub fn cc(mut self, contact: Contact) -> Self {
        self.message.cc.push(contact);
        self
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.message.subject = subject.to_string();
        self
    }

    pub fn body_len(mut self, chars: usize) -> Self {
        self.message.body = "x".repeat(chars);
        self
    }

    pub fn attachments(mut self, count: u32) -> Self {
        self.message.attachment_count = count;
        self
    }

    pub fn build(self) -> Message {
        self.message
    }
}
