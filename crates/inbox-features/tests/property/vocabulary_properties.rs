use std::collections::HashSet;

use inbox_core::config::EncodingConfig;
use inbox_core::models::{BinEdge, Contact, IdentitySource, NumericSource};
use inbox_features::{
    DynamicFeature, Feature, FeatureMeta, FeatureSet, FeatureSetSnapshot, NumericFeature,
};
use proptest::prelude::*;
use test_fixtures::{carol, MessageBuilder};

fn arb_edge() -> impl Strategy<Value = BinEdge> {
    prop_oneof![Just(BinEdge::Inclusive), Just(BinEdge::Exclusive)]
}

/// Strictly ascending integral bounds.
fn arb_bins() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::btree_set(0u32..5000, 1..8)
        .prop_map(|set| set.into_iter().map(f64::from).collect())
}

/// Addresses drawn from a small pool so streams revisit identities.
fn arb_address() -> impl Strategy<Value = String> {
    (0u8..12, any::<bool>()).prop_map(|(n, upper)| {
        let addr = format!("person{n}@x.com");
        if upper {
            addr.to_uppercase()
        } else {
            addr
        }
    })
}

fn dynamic(source: IdentitySource) -> Feature {
    Feature::Dynamic(DynamicFeature::new(FeatureMeta::per_user("F", ""), source))
}

// ── Numeric binning ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn numeric_emits_one_active_bucket(
        bins in arb_bins(),
        edge in arb_edge(),
        unbounded in any::<bool>(),
        len in 0usize..6000,
    ) {
        let user = carol();
        let mut f = Feature::NumericBinned(NumericFeature::new(
            FeatureMeta::shared("Body", ""),
            NumericSource::BodyLength,
            bins.clone(),
            edge,
            unbounded,
        ).unwrap());
        f.configure(&user).unwrap();
        prop_assert_eq!(f.len(), bins.len() + usize::from(unbounded));

        let pairs = f.compute(&user, &MessageBuilder::new("m").body_len(len).build()).unwrap();
        prop_assert_eq!(pairs.len(), 1);
        prop_assert_eq!(pairs[0].value, 1.0);
        prop_assert!((pairs[0].bucket as usize) < f.len());
    }

    #[test]
    fn numeric_is_monotone(
        bins in arb_bins(),
        edge in arb_edge(),
        a in 0usize..6000,
        b in 0usize..6000,
    ) {
        let user = carol();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let mut f = Feature::NumericBinned(NumericFeature::new(
            FeatureMeta::shared("Body", ""),
            NumericSource::BodyLength,
            bins,
            edge,
            true,
        ).unwrap());
        f.configure(&user).unwrap();
        let low = f.compute(&user, &MessageBuilder::new("lo").body_len(lo).build()).unwrap()[0].bucket;
        let high = f.compute(&user, &MessageBuilder::new("hi").body_len(hi).build()).unwrap()[0].bucket;
        prop_assert!(low <= high);
    }
}

// ── Dynamic vocabulary ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn recipient_weights_sum_to_one(
        to in prop::collection::vec(arb_address(), 0..6),
        cc in prop::collection::vec(arb_address(), 0..6),
    ) {
        let user = carol();
        let mut f = dynamic(IdentitySource::Recipients);
        f.configure(&user).unwrap();

        let mut builder = MessageBuilder::new("m");
        for a in &to {
            builder = builder.to(Contact::address(a.clone()));
        }
        for a in &cc {
            builder = builder.cc(Contact::address(a.clone()));
        }
        let pairs = f.compute(&user, &builder.build()).unwrap();

        let total: f64 = pairs.iter().map(|p| p.value).sum();
        prop_assert!((total - 1.0).abs() < 1e-9);

        let distinct: HashSet<String> = to.iter().chain(&cc).map(|a| a.to_lowercase()).collect();
        prop_assert_eq!(pairs.len(), distinct.len().max(1));
        let buckets: HashSet<u32> = pairs.iter().map(|p| p.bucket).collect();
        prop_assert_eq!(buckets.len(), pairs.len());
    }

    #[test]
    fn sender_growth_is_append_only(
        senders in prop::collection::vec(arb_address(), 1..40),
    ) {
        let user = carol();
        let mut f = dynamic(IdentitySource::Sender);
        f.configure(&user).unwrap();

        let mut previous = f.buckets().clone();
        for (i, sender) in senders.iter().enumerate() {
            let m = MessageBuilder::new(&format!("m{i}")).from(Contact::address(sender.clone())).build();
            f.compute(&user, &m).unwrap();
            prop_assert!(f.len() >= previous.len());
            prop_assert_eq!(&f.buckets().as_slice()[..previous.len()], previous.as_slice());
            previous = f.buckets().clone();
        }

        let distinct: HashSet<String> = senders.iter().map(|a| a.to_lowercase()).collect();
        prop_assert_eq!(f.len(), 2 + distinct.len());
    }

    #[test]
    fn snapshot_restores_any_stream(
        senders in prop::collection::vec(arb_address(), 0..20),
    ) {
        let user = carol();
        let mut set = FeatureSet::from_config(&EncodingConfig::default()).unwrap();
        set.configure(&user).unwrap();
        for (i, sender) in senders.iter().enumerate() {
            let m = MessageBuilder::new(&format!("m{i}"))
                .from(Contact::address(sender.clone()))
                .to(Contact::address("carol@example.com"))
                .build();
            set.compute(&user, &m).unwrap();
        }

        let json = set.snapshot().to_json().unwrap();
        let restored = FeatureSetSnapshot::from_json(&json).unwrap().into_feature_set().unwrap();
        prop_assert_eq!(restored.fingerprint(), set.fingerprint());
        prop_assert!(restored.check_compatible(&set).is_ok());
    }
}
