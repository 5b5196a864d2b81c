use inbox_core::config::EncodingConfig;
use inbox_core::constants::SNAPSHOT_FORMAT_VERSION;
use inbox_core::errors::{FeatureError, InboxError};
use inbox_core::models::Contact;
use inbox_features::{Feature, FeatureSet, FeatureSetSnapshot};
use test_fixtures::{load_mailbox, MessageBuilder};

fn trained() -> (FeatureSet, test_fixtures::Mailbox) {
    let mailbox = load_mailbox("carol");
    let mut set = FeatureSet::from_config(&EncodingConfig::default()).unwrap();
    set.configure(&mailbox.user).unwrap();
    set.compute_batch(&mailbox.user, &mailbox.messages).unwrap();
    (set, mailbox)
}

// ── Round trip ────────────────────────────────────────────────────────────

#[test]
fn save_and_load_reproduces_every_bucket() {
    let (set, _) = trained();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("features.json");

    set.save(&path).unwrap();
    let loaded = FeatureSet::load(&path).unwrap();

    assert_eq!(loaded, set);
    assert_eq!(loaded.fingerprint(), set.fingerprint());
    assert_eq!(loaded.offsets(), set.offsets());
}

#[test]
fn restored_set_resolves_known_identities_without_growth() {
    let (set, mailbox) = trained();
    let json = set.snapshot().to_json().unwrap();
    let mut loaded = FeatureSetSnapshot::from_json(&json)
        .unwrap()
        .into_feature_set()
        .unwrap();

    let before = loaded.dimension();
    let original = set.clone().compute(&mailbox.user, &mailbox.messages[0]).unwrap();
    let reloaded = loaded.compute(&mailbox.user, &mailbox.messages[0]).unwrap();
    assert_eq!(loaded.dimension(), before);
    assert_eq!(reloaded, original);
}

#[test]
fn restored_set_keeps_growing_from_the_end() {
    let (set, mailbox) = trained();
    let mut loaded = FeatureSetSnapshot::from_json(&set.snapshot().to_json().unwrap())
        .unwrap()
        .into_feature_set()
        .unwrap();
    // configure after load must not renumber or duplicate
    loaded.configure(&mailbox.user).unwrap();
    assert_eq!(loaded, set);

    let senders = loaded.feature("Sender").unwrap().len();
    let m = MessageBuilder::new("new")
        .from(Contact::named("Grace Hopper", "grace@navy.mil"))
        .build();
    loaded.compute(&mailbox.user, &m).unwrap();

    let sender = loaded.feature("Sender").unwrap();
    assert_eq!(sender.len(), senders + 1);
    assert_eq!(sender.bucket_name(senders as u32), Some("Grace Hopper"));
    assert_eq!(
        &sender.buckets().as_slice()[..senders],
        set.feature("Sender").unwrap().buckets().as_slice()
    );
}

// ── Corruption ────────────────────────────────────────────────────────────

#[test]
fn unsupported_version_is_rejected() {
    let (set, _) = trained();
    let mut snapshot = set.snapshot();
    snapshot.format_version = SNAPSHOT_FORMAT_VERSION + 1;
    let err = snapshot.into_feature_set().unwrap_err();
    assert!(matches!(
        err,
        InboxError::FeatureError(FeatureError::CorruptSnapshot { .. })
    ));
}

#[test]
fn fingerprint_mismatch_is_rejected() {
    let (set, _) = trained();
    let mut snapshot = set.snapshot();
    snapshot.fingerprint = "0".repeat(64);
    assert!(snapshot.into_feature_set().is_err());
}

#[test]
fn renumbered_bucket_is_rejected() {
    let (set, _) = trained();
    let mut snapshot = set.snapshot();
    if let Some(Feature::Dynamic(sender)) = snapshot.features.first_mut() {
        let mut value = serde_json::to_value(&sender.buckets).unwrap();
        value[1]["index"] = serde_json::json!(7);
        sender.buckets = serde_json::from_value(value).unwrap();
    } else {
        panic!("expected the sender feature first");
    }
    let err = snapshot.into_feature_set().unwrap_err();
    assert!(matches!(
        err,
        InboxError::FeatureError(FeatureError::CorruptSnapshot { ref feature, .. }) if feature == "Sender"
    ));
}

#[test]
fn malformed_json_is_a_serialization_error() {
    let err = FeatureSetSnapshot::from_json("{ not json").unwrap_err();
    assert!(matches!(err, InboxError::SerializationError(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FeatureSet::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, InboxError::Io(_)));
}
