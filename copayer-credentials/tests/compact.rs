//! Tests for the compact export

use copayer_credentials::{Credentials, Error, Network, PublicKeyRingEntry};

#[test]
fn test_round_trip_signing_credentials() {
    let mut original = Credentials::create(Network::Test).unwrap();
    let peer = Credentials::create(Network::Test).unwrap();
    original
        .add_wallet_info("wallet-1", "Shared", 2, 2, Some("0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d"), "alice")
        .unwrap();
    original.set_public_key_ring(&[original.self_ring_entry(), peer.self_ring_entry()]);

    let restored = Credentials::import_compact(&original.export_compact().unwrap()).unwrap();

    assert!(restored.can_sign());
    assert_eq!(restored.x_priv_key(), original.x_priv_key());
    assert_eq!(restored.x_pub_key(), original.x_pub_key());
    assert_eq!(restored.request_pub_key(), original.request_pub_key());
    assert_eq!(restored.copayer_id(), original.copayer_id());
    assert_eq!(restored.personal_encrypting_key(), original.personal_encrypting_key());
    assert_eq!(restored.network(), Network::Test);
    assert_eq!(restored.m(), Some(2));
    assert_eq!(restored.n(), Some(2));
    assert_eq!(restored.shared_encrypting_key(), original.shared_encrypting_key());
    assert!(restored.is_complete());

    // Wallet identity is not part of the compact form
    assert!(!restored.has_wallet_info());
    assert_eq!(restored.copayer_name(), None);

    // Self entry moves to the end of the ring
    assert_eq!(
        restored.public_key_ring().entries(),
        &[peer.self_ring_entry(), original.self_ring_entry()]
    );
}

#[test]
fn test_round_trip_watch_only_credentials() {
    let signing = Credentials::create(Network::Main).unwrap();
    let mut original = Credentials::from_extended_public_key(
        signing.x_pub_key(),
        signing.request_priv_key().unwrap(),
    )
    .unwrap();
    original.set_public_key_ring(&[PublicKeyRingEntry::temporary("peer", "02cc")]);

    let restored = Credentials::import_compact(&original.export_compact().unwrap()).unwrap();

    assert!(!restored.can_sign());
    assert_eq!(restored.x_pub_key(), original.x_pub_key());
    assert_eq!(restored.request_priv_key(), original.request_priv_key());
    assert_eq!(restored.request_pub_key(), original.request_pub_key());
    assert_eq!(restored.copayer_id(), original.copayer_id());
    assert_eq!(restored.network(), Network::Main);
    assert_eq!(restored.public_key_ring().len(), 2);
    assert!(restored.public_key_ring().get("peer").unwrap().is_temporary_request_key);
}

#[test]
fn test_malformed_input_is_a_format_error() {
    let credentials = Credentials::create(Network::Test).unwrap();
    let compact = credentials.export_compact().unwrap();
    let truncated = &compact[..compact.len() / 2];

    for input in [
        "not json",
        "{\"version\":\"1.0.0\"}",
        "\"1.0.0\"",
        "[]",
        r#"["1.0.0","xprv"]"#,
        truncated,
    ] {
        let result = Credentials::import_compact(input);
        assert!(matches!(result, Err(Error::Format(_))), "{}", input);
    }
}

#[test]
fn test_garbage_keys_are_rejected() {
    let compact = r#"["1.0.0","xprvnotakey","","",null,null,[],null]"#;
    assert!(matches!(Credentials::import_compact(compact), Err(Error::InvalidKey(_))));
}
