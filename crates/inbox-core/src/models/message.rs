use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::contact::Contact;
use super::user::User;

/// Where the mailbox owner appears on a message's address lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientPosition {
    /// First entry on the To line.
    FirstOnTo,
    /// On the To line, not first.
    OnTo,
    /// On the Cc line only.
    OnCc,
}

/// An email message as seen from one user's mailbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    pub sender: Contact,
    #[serde(default)]
    pub to: Vec<Contact>,
    #[serde(default)]
    pub cc: Vec<Contact>,
    #[serde(default)]
    pub attachment_count: u32,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    /// To recipients followed by Cc recipients.
    pub fn recipients(&self) -> impl Iterator<Item = &Contact> {
        self.to.iter().chain(self.cc.iter())
    }

    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len()
    }

    /// Body length in characters.
    pub fn body_length(&self) -> usize {
        self.body.chars().count()
    }

    /// Subject length in characters.
    pub fn subject_length(&self) -> usize {
        self.subject.chars().count()
    }

    pub fn has_attachments(&self) -> bool {
        self.attachment_count > 0
    }

    /// Whether the user sent this message.
    pub fn is_from(&self, user: &User) -> bool {
        is_user(&self.sender, user)
    }

    /// The user's position on the address lines, `None` when absent
    /// (e.g. Bcc or list traffic).
    pub fn user_position(&self, user: &User) -> Option<RecipientPosition> {
        if let Some(idx) = self.to.iter().position(|c| is_user(c, user)) {
            return Some(if idx == 0 {
                RecipientPosition::FirstOnTo
            } else {
                RecipientPosition::OnTo
            });
        }
        if self.cc.iter().any(|c| is_user(c, user)) {
            return Some(RecipientPosition::OnCc);
        }
        None
    }

    /// True when the user is the message's single recipient.
    pub fn sent_only_to(&self, user: &User) -> bool {
        self.recipient_count() == 1 && self.recipients().all(|c| is_user(c, user))
    }
}

fn is_user(contact: &Contact, user: &User) -> bool {
    let user_keys = user.identity_keys();
    contact.identity_keys().iter().any(|k| user_keys.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: Vec<Contact>, cc: Vec<Contact>) -> Message {
        Message {
            id: "m1".to_string(),
            subject: "Hello".to_string(),
            body: "Body".to_string(),
            sender: Contact::named("Bob", "bob@x.com"),
            to,
            cc,
            attachment_count: 0,
            sent_at: Utc::now(),
        }
    }

    #[test]
    fn position_first_on_to() {
        let user = User::new("u1", "Carol").with_address("carol@x.com");
        let m = message(vec![Contact::address("CAROL@x.com")], vec![]);
        assert_eq!(m.user_position(&user), Some(RecipientPosition::FirstOnTo));
        assert!(m.sent_only_to(&user));
    }

    #[test]
    fn position_on_cc_and_absent() {
        let user = User::new("u1", "Carol").with_address("carol@x.com");
        let m = message(vec![Contact::address("dave@x.com")], vec![Contact::display("carol")]);
        assert_eq!(m.user_position(&user), Some(RecipientPosition::OnCc));

        let m = message(vec![Contact::address("dave@x.com")], vec![]);
        assert_eq!(m.user_position(&user), None);
        assert!(!m.sent_only_to(&user));
    }
}
