//! Concurrency wrappers.
//!
//! Features have no internal synchronization. A feature shared between
//! workers goes behind [`SharedFeature`], which holds one lock across the
//! whole read-check-append sequence of `compute`. Per-user models use
//! [`UserEncoders`], which gives each user an exclusive [`FeatureSet`].

use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use inbox_core::errors::{FeatureError, InboxResult};
use inbox_core::models::{Message, User, UserId};

use crate::bucket::FeatureBucketValuePair;
use crate::feature::Feature;
use crate::set::FeatureSet;
use crate::snapshot::FeatureSetSnapshot;
use crate::sparse::SparseVector;

/// A single feature instance shared across threads behind one writer lock.
#[derive(Debug, Clone)]
pub struct SharedFeature {
    inner: Arc<Mutex<Feature>>,
}

impl SharedFeature {
    pub fn new(feature: Feature) -> Self {
        Self {
            inner: Arc::new(Mutex::new(feature)),
        }
    }

    // A panic mid-compute can only leave a fully appended bucket behind,
    // so a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Feature> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn configure(&self, user: &User) -> Result<(), FeatureError> {
        self.lock().configure(user)
    }

    pub fn compute(
        &self,
        user: &User,
        message: &Message,
    ) -> Result<Vec<FeatureBucketValuePair>, FeatureError> {
        self.lock().compute(user, message)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Run a closure against the locked feature.
    pub fn with<R>(&self, f: impl FnOnce(&mut Feature) -> R) -> R {
        f(&mut *self.lock())
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> Feature {
        self.lock().clone()
    }
}

/// One exclusive [`FeatureSet`] per user, cloned from a template and
/// configured on first use.
///
/// Calls for different users run concurrently; calls for the same user
/// serialize on the map entry.
#[derive(Debug)]
pub struct UserEncoders {
    template: FeatureSet,
    sets: DashMap<UserId, FeatureSet>,
}

impl UserEncoders {
    pub fn new(template: FeatureSet) -> Self {
        Self {
            template,
            sets: DashMap::new(),
        }
    }

    /// Adopt a previously persisted set for a user (e.g. reloaded from a snapshot).
    pub fn insert(&self, user: UserId, set: FeatureSet) {
        self.sets.insert(user, set);
    }

    pub fn encode(&self, user: &User, message: &Message) -> InboxResult<SparseVector> {
        let mut set = match self.sets.entry(user.id.clone()) {
            Entry::Occupied(entry) => entry.into_ref(),
            Entry::Vacant(entry) => {
                let mut set = self.template.clone();
                set.configure(user)?;
                entry.insert(set)
            }
        };
        set.compute(user, message)
    }

    pub fn dimension(&self, user: &UserId) -> Option<usize> {
        self.sets.get(user).map(|s| s.dimension())
    }

    pub fn snapshot(&self, user: &UserId) -> Option<FeatureSetSnapshot> {
        self.sets.get(user).map(|s| FeatureSetSnapshot::capture(&s))
    }

    pub fn user_count(&self) -> usize {
        self.sets.len()
    }

    pub fn users(&self) -> Vec<UserId> {
        self.sets.iter().map(|r| r.key().clone()).collect()
    }
}
