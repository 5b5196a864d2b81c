use inbox_core::config::CategoryDefinition;
use inbox_core::errors::FeatureError;
use inbox_core::models::{
    BinEdge, BinarySource, CategoryMatcher, Contact, NumericSource, RecipientPosition,
};
use inbox_features::{
    BinaryFeature, BucketPayload, Feature, FeatureMeta, NumericFeature, OneOfNFeature,
};
use test_fixtures::{carol, MessageBuilder};

fn body_length(bins: &[f64], edge: BinEdge, unbounded_above: bool) -> Feature {
    Feature::NumericBinned(
        NumericFeature::new(
            FeatureMeta::shared("BodyLength", "Body length"),
            NumericSource::BodyLength,
            bins.to_vec(),
            edge,
            unbounded_above,
        )
        .unwrap(),
    )
}

fn active_name(feature: &mut Feature, chars: usize) -> String {
    let user = carol();
    let message = MessageBuilder::new("m").body_len(chars).build();
    let pairs = feature.compute(&user, &message).unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].value, 1.0);
    feature.bucket_name(pairs[0].bucket).unwrap().to_string()
}

// ── Numeric-binned ────────────────────────────────────────────────────────

#[test]
fn numeric_first_match_scan() {
    let mut f = body_length(&[5.0, 10.0, 100.0], BinEdge::Inclusive, true);
    f.configure(&carol()).unwrap();

    assert_eq!(f.buckets().names(), vec!["5", "6-10", "11-100", ">100"]);
    assert_eq!(active_name(&mut f, 7), "6-10");
    assert_eq!(active_name(&mut f, 0), "5");
    assert_eq!(active_name(&mut f, 1000), ">100");
}

#[test]
fn numeric_edges_put_boundaries_on_opposite_sides() {
    let mut inclusive = body_length(&[5.0, 10.0, 100.0], BinEdge::Inclusive, true);
    let mut exclusive = body_length(&[5.0, 10.0, 100.0], BinEdge::Exclusive, true);
    inclusive.configure(&carol()).unwrap();
    exclusive.configure(&carol()).unwrap();

    assert_eq!(active_name(&mut inclusive, 10), "6-10");
    assert_eq!(active_name(&mut exclusive, 10), "10-99");
    assert_eq!(active_name(&mut inclusive, 100), "11-100");
    assert_eq!(active_name(&mut exclusive, 100), ">=100");
}

#[test]
fn numeric_bounded_above_uses_last_bucket() {
    let mut f = body_length(&[5.0, 10.0], BinEdge::Inclusive, false);
    f.configure(&carol()).unwrap();
    assert_eq!(f.len(), 2);
    assert_eq!(active_name(&mut f, 50), "6-10");
}

#[test]
fn numeric_payload_records_bounds() {
    let mut f = body_length(&[5.0, 10.0], BinEdge::Inclusive, true);
    f.configure(&carol()).unwrap();
    assert_eq!(
        f.buckets()[1].payload,
        BucketPayload::Bin {
            lower: Some(5.0),
            upper: Some(10.0)
        }
    );
    assert_eq!(
        f.buckets()[2].payload,
        BucketPayload::Bin {
            lower: Some(10.0),
            upper: None
        }
    );
}

#[test]
fn numeric_rejects_invalid_bins() {
    for bins in [vec![], vec![10.0, 5.0], vec![1.0, 1.0]] {
        let err = NumericFeature::new(
            FeatureMeta::shared("Len", ""),
            NumericSource::BodyLength,
            bins,
            BinEdge::Inclusive,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, FeatureError::InvalidBinConfiguration { .. }));
    }
}

#[test]
fn numeric_compute_before_configure_is_not_configured() {
    let mut f = body_length(&[5.0], BinEdge::Inclusive, true);
    let err = f
        .compute(&carol(), &MessageBuilder::new("m").build())
        .unwrap_err();
    assert_eq!(
        err,
        FeatureError::NotConfigured {
            feature: "BodyLength".to_string()
        }
    );
}

#[test]
fn configure_twice_is_idempotent() {
    let mut f = body_length(&[5.0, 10.0, 100.0], BinEdge::Inclusive, true);
    f.configure(&carol()).unwrap();
    let first = f.buckets().clone();
    f.configure(&carol()).unwrap();
    assert_eq!(f.buckets(), &first);
    assert_eq!(f.buckets().names(), first.names());
}

// ── Binary ────────────────────────────────────────────────────────────────

#[test]
fn binary_always_reports_its_single_bucket() {
    let user = carol();
    let mut f = Feature::Binary(BinaryFeature::new(
        FeatureMeta::shared("HasAttachments", "Has attachments"),
        BinarySource::HasAttachments,
    ));
    f.configure(&user).unwrap();
    assert_eq!(f.len(), 1);

    let with = MessageBuilder::new("a").attachments(2).build();
    let without = MessageBuilder::new("b").build();

    let pairs = f.compute(&user, &with).unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!((pairs[0].bucket, pairs[0].value), (0, 1.0));

    let pairs = f.compute(&user, &without).unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!((pairs[0].bucket, pairs[0].value), (0, 0.0));
}

#[test]
fn binary_from_user_matches_any_alias() {
    let user = carol();
    let mut f = Feature::Binary(BinaryFeature::new(
        FeatureMeta::shared("FromUser", ""),
        BinarySource::FromUser,
    ));
    f.configure(&user).unwrap();
    let own = MessageBuilder::new("a")
        .from(Contact::address("CJones@Example.org"))
        .build();
    assert_eq!(f.compute(&user, &own).unwrap()[0].value, 1.0);
}

// ── One-of-N ──────────────────────────────────────────────────────────────

fn subject_prefix(include_other: bool) -> Feature {
    let categories = ["RE:", "FW:"]
        .iter()
        .map(|p| CategoryDefinition {
            name: p.to_string(),
            matcher: CategoryMatcher::SubjectPrefix(p.to_string()),
        })
        .collect();
    Feature::OneOfN(
        OneOfNFeature::new(
            FeatureMeta::shared("SubjectPrefix", ""),
            categories,
            include_other,
        )
        .unwrap(),
    )
}

#[test]
fn one_of_n_first_match_then_other() {
    let user = carol();
    let mut f = subject_prefix(true);
    f.configure(&user).unwrap();
    assert_eq!(f.buckets().names(), vec!["RE:", "FW:", "Other"]);

    let cases = [("re: hello", "RE:"), ("  Fw: menu", "FW:"), ("Hello", "Other")];
    for (subject, expected) in cases {
        let m = MessageBuilder::new("m").subject(subject).build();
        let pairs = f.compute(&user, &m).unwrap();
        assert_eq!(f.bucket_name(pairs[0].bucket), Some(expected), "{subject}");
        assert_eq!(pairs[0].value, 1.0);
    }
}

#[test]
fn one_of_n_without_other_reports_zero_weight_on_miss() {
    let user = carol();
    let mut f = subject_prefix(false);
    f.configure(&user).unwrap();
    let pairs = f
        .compute(&user, &MessageBuilder::new("m").subject("Hello").build())
        .unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].value, 0.0);
}

#[test]
fn one_of_n_requires_configure_and_categories() {
    let user = carol();
    let mut f = subject_prefix(true);
    let err = f
        .compute(&user, &MessageBuilder::new("m").build())
        .unwrap_err();
    assert!(matches!(err, FeatureError::NotConfigured { .. }));

    let err = OneOfNFeature::new(FeatureMeta::shared("Empty", ""), vec![], true).unwrap_err();
    assert!(matches!(err, FeatureError::EmptyVocabulary { .. }));
}

#[test]
fn one_of_n_position_is_ordered() {
    let user = carol();
    let categories = vec![
        CategoryDefinition {
            name: "First on To".into(),
            matcher: CategoryMatcher::UserPosition(RecipientPosition::FirstOnTo),
        },
        CategoryDefinition {
            name: "On To".into(),
            matcher: CategoryMatcher::UserPosition(RecipientPosition::OnTo),
        },
        CategoryDefinition {
            name: "On Cc".into(),
            matcher: CategoryMatcher::UserPosition(RecipientPosition::OnCc),
        },
    ];
    let mut f = Feature::OneOfN(
        OneOfNFeature::new(FeatureMeta::shared("ToCcPosition", ""), categories, true).unwrap(),
    );
    f.configure(&user).unwrap();

    let second_on_to = MessageBuilder::new("m")
        .to(Contact::address("dave@x.com"))
        .to(Contact::address("carol@example.com"))
        .build();
    let pairs = f.compute(&user, &second_on_to).unwrap();
    assert_eq!(f.bucket_name(pairs[0].bucket), Some("On To"));

    let bcc = MessageBuilder::new("m").to(Contact::address("dave@x.com")).build();
    let pairs = f.compute(&user, &bcc).unwrap();
    assert_eq!(f.bucket_name(pairs[0].bucket), Some("Other"));
}
