//! # inbox-features
//!
//! Encodes email messages into sparse feature vectors for reply prediction.
//!
//! ## Feature kinds
//!
//! | Kind | Buckets | Vocabulary |
//! |------|---------|------------|
//! | Binary | 1 | fixed |
//! | Numeric-binned | one per bin bound (+ overflow) | fixed |
//! | One-of-N | one per category (+ "Other") | fixed |
//! | Dynamic (Sender / Recipients) | one per identity | grows per user |
//! | Compound | cross product of two features | grows with either component |
//!
//! ## Index stability
//!
//! Bucket lists are append-only: `buckets[i].index == i` always, and a bucket's
//! `(index, name)` never changes once created. Trained weight vectors are
//! positionally keyed, so `compute` on dynamic and compound features takes
//! `&mut self` and may append buckets as a side effect.

pub mod bucket;
pub mod builder;
pub mod feature;
pub mod kinds;
pub mod set;
pub mod shared;
pub mod snapshot;
pub mod sparse;
pub mod vocabulary;

pub use bucket::{Bucket, BucketList, BucketPayload, FeatureBucketValuePair, IdentityRole};
pub use feature::{Feature, FeatureMeta};
pub use kinds::{BinaryFeature, CompoundFeature, DynamicFeature, NumericFeature, OneOfNFeature};
pub use set::FeatureSet;
pub use shared::{SharedFeature, UserEncoders};
pub use snapshot::FeatureSetSnapshot;
pub use sparse::SparseVector;
