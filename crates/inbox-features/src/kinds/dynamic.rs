//! Per-user categorical features whose vocabulary grows as identities appear.

use inbox_core::constants::UNKNOWN_PERSON_NAME;
use inbox_core::errors::FeatureError;
use inbox_core::identity::IdentityKey;
use inbox_core::models::{Contact, IdentitySource, Message, User};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bucket::{BucketList, BucketPayload, FeatureBucketValuePair, IdentityRole};
use crate::feature::FeatureMeta;
use crate::vocabulary::{PerUserVocabulary, UserVocabulary};

/// M-of-N identity feature (Sender or Recipients).
///
/// Buckets live in one list shared by all users; each user resolves through
/// their own identity map. A miss allocates a new bucket, indexed under the
/// contact's canonical name and every alias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicFeature {
    pub meta: FeatureMeta,
    pub source: IdentitySource,
    pub buckets: BucketList,
    #[serde(skip)]
    vocabulary: PerUserVocabulary,
}

impl DynamicFeature {
    pub fn new(meta: FeatureMeta, source: IdentitySource) -> Self {
        Self {
            meta,
            source,
            buckets: BucketList::new(),
            vocabulary: PerUserVocabulary::new(),
        }
    }

    pub fn vocabulary(&self) -> &PerUserVocabulary {
        &self.vocabulary
    }

    /// Replace the user's identity map, then make sure the sentinel and
    /// the user's own bucket exist.
    ///
    /// The map is rebuilt from bucket payloads, so buckets allocated for this
    /// user in earlier sessions keep their indices.
    pub fn configure(&mut self, user: &User) {
        let mut vocab = PerUserVocabulary::rebuild_user(&self.buckets, &user.id);

        if vocab.unknown().is_none() {
            let index = self.allocate(user, UNKNOWN_PERSON_NAME, IdentityRole::Unknown, Vec::new());
            vocab.set_role(IdentityRole::Unknown, index);
        }
        if vocab.own().is_none() {
            let keys = user.identity_keys();
            let name = if user.display_name.trim().is_empty() {
                user.id.to_string()
            } else {
                user.display_name.clone()
            };
            let index = self.allocate(user, &name, IdentityRole::User, keys.clone());
            vocab.set_role(IdentityRole::User, index);
            vocab.index(&keys, index);
        }

        debug!(
            feature = %self.meta.name,
            user = %user.id,
            keys = vocab.key_count(),
            "dynamic vocabulary configured"
        );
        self.vocabulary.insert(user.id.clone(), vocab);
    }

    /// Read-only lookup; `None` on miss or for an unconfigured user.
    pub fn resolve(&self, user: &User, contact: &Contact) -> Option<u32> {
        self.vocabulary.get(&user.id)?.lookup(contact)
    }

    /// Pre-seed an address-book contact through the resolve-or-allocate path.
    ///
    /// Only this instance is seeded. A compound built over the same
    /// definition holds its own copy; use `FeatureSet::register_contact`
    /// to reach every copy.
    pub fn register_contact(&mut self, user: &User, contact: &Contact) -> Result<u32, FeatureError> {
        self.resolve_or_allocate(user, contact)
    }

    pub fn compute(
        &mut self,
        user: &User,
        message: &Message,
    ) -> Result<Vec<FeatureBucketValuePair>, FeatureError> {
        match self.source {
            IdentitySource::Sender => {
                let bucket = self.resolve_or_allocate(user, &message.sender)?;
                Ok(vec![FeatureBucketValuePair::new(bucket, 1.0)])
            }
            IdentitySource::Recipients => self.compute_recipients(user, message),
        }
    }

    /// One pair per distinct resolved bucket; each recipient contributes
    /// `1/k`, so weights always sum to 1.0.
    fn compute_recipients(
        &mut self,
        user: &User,
        message: &Message,
    ) -> Result<Vec<FeatureBucketValuePair>, FeatureError> {
        let k = message.recipient_count();
        if k == 0 {
            let unknown = self.user_vocabulary(user)?.unknown().unwrap_or(0);
            return Ok(vec![FeatureBucketValuePair::new(unknown, 1.0)]);
        }

        let weight = 1.0 / k as f64;
        let mut pairs: Vec<FeatureBucketValuePair> = Vec::with_capacity(k);
        for recipient in message.recipients() {
            let bucket = self.resolve_or_allocate(user, recipient)?;
            match pairs.iter_mut().find(|p| p.bucket == bucket) {
                Some(existing) => existing.value += weight,
                None => pairs.push(FeatureBucketValuePair::new(bucket, weight)),
            }
        }
        Ok(pairs)
    }

    fn user_vocabulary(&self, user: &User) -> Result<&UserVocabulary, FeatureError> {
        self.vocabulary
            .get(&user.id)
            .ok_or_else(|| FeatureError::UserNotConfigured {
                feature: self.meta.name.clone(),
                user: user.id.to_string(),
            })
    }

    /// Resolution order: canonical name, then first alias hit, then allocate.
    /// Anonymous contacts resolve to the user's sentinel.
    fn resolve_or_allocate(&mut self, user: &User, contact: &Contact) -> Result<u32, FeatureError> {
        let vocab = self.user_vocabulary(user)?;
        if let Some(hit) = vocab.lookup(contact) {
            return Ok(hit);
        }
        let keys: Vec<IdentityKey> = contact.identity_keys();
        let name = match contact.canonical_name() {
            Some(name) if !keys.is_empty() => name.trim().to_string(),
            _ => return Ok(vocab.unknown().unwrap_or(0)),
        };

        let index = self.allocate(user, &name, IdentityRole::Contact, keys.clone());
        if let Some(vocab) = self.vocabulary.get_mut(&user.id) {
            vocab.index(&keys, index);
        }
        Ok(index)
    }

    fn allocate(
        &mut self,
        user: &User,
        name: &str,
        role: IdentityRole,
        keys: Vec<IdentityKey>,
    ) -> u32 {
        let index = self.buckets.push(
            &self.meta.name,
            name,
            BucketPayload::Identity {
                user: user.id.clone(),
                role,
                keys,
            },
        );
        debug!(
            feature = %self.meta.name,
            user = %user.id,
            index,
            name,
            role = ?role,
            "identity bucket allocated"
        );
        index
    }

    pub(crate) fn restore(&mut self) -> Result<(), FeatureError> {
        self.buckets.verify(&self.meta.name)?;
        self.vocabulary = PerUserVocabulary::rebuild(&self.buckets, &self.meta.name)?;
        Ok(())
    }
}
