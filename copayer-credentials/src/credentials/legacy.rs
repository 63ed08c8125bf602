//! Migration of legacy single-root wallets
//!
//! Legacy wallets hold one master private key and the address subtree
//! extended public keys of every copayer, with no request keys. Peers get a
//! placeholder request key derived from their public root until they publish
//! their own.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::crypto::keys::{self, bitcoin as encoding, REQUEST_KEY, TMP_REQUEST_KEY};
use crate::error::{Error, Result};
use super::{Credentials, Origin, PublicKeyRingEntry};

/// Private half of a legacy wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPrivateKey {
    pub extended_private_key_string: String,
}

/// Copayer roster of a legacy wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPublicKeyRing {
    pub copayers_ext_pub_keys: Vec<String>,
}

/// A wallet in the legacy single-root representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyWallet {
    pub private_key: LegacyPrivateKey,
    pub public_key_ring: LegacyPublicKeyRing,
}

impl LegacyWallet {
    /// Parse a legacy wallet from its JSON export
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }
}

impl Credentials {
    /// Convert a legacy wallet into credentials with a mixed ring.
    ///
    /// The entry matching this copayer carries its real request key; every
    /// other entry is marked temporary.
    pub fn from_legacy(wallet: &LegacyWallet) -> Result<Self> {
        let x_priv_key = &wallet.private_key.extended_private_key_string;
        let mut credentials = Self::from_extended_private_key(x_priv_key)?;
        credentials.origin = Origin::MigratedLegacy;

        let master = keys::parse_xpriv(x_priv_key)?;
        let ring = wallet
            .public_key_ring
            .copayers_ext_pub_keys
            .iter()
            .map(|x_pub_key| -> Result<PublicKeyRingEntry> {
                if *x_pub_key == credentials.x_pub_key {
                    let request = keys::derive_private(&master, REQUEST_KEY)?;
                    let request_pub_key = keys::neuter(&request).public_key;
                    Ok(PublicKeyRingEntry::new(x_pub_key, &encoding::public_key_to_hex(&request_pub_key)))
                } else {
                    let peer = keys::parse_xpub(x_pub_key)?;
                    let request_pub_key = keys::derive_public(&peer, TMP_REQUEST_KEY)?.public_key;
                    Ok(PublicKeyRingEntry::temporary(x_pub_key, &encoding::public_key_to_hex(&request_pub_key)))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        credentials.set_public_key_ring(&ring);

        info!(
            copayer_id = %credentials.copayer_id,
            copayers = ring.len(),
            "Legacy wallet migrated"
        );
        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::Network;

    fn legacy(x_priv_key: &str, copayers: &[&Credentials]) -> LegacyWallet {
        LegacyWallet {
            private_key: LegacyPrivateKey {
                extended_private_key_string: x_priv_key.to_string(),
            },
            public_key_ring: LegacyPublicKeyRing {
                copayers_ext_pub_keys: copayers.iter().map(|c| c.x_pub_key().to_string()).collect(),
            },
        }
    }

    #[test]
    fn test_self_entry_uses_real_request_key() {
        let me = Credentials::create(Network::Test).unwrap();
        let peer = Credentials::create(Network::Test).unwrap();

        let migrated = Credentials::from_legacy(&legacy(me.x_priv_key().unwrap(), &[&peer, &me])).unwrap();

        assert_eq!(migrated.origin(), Origin::MigratedLegacy);
        assert_eq!(migrated.copayer_id(), me.copayer_id());
        let own = migrated.public_key_ring().get(me.x_pub_key()).unwrap();
        assert_eq!(own, &me.self_ring_entry());

        let other = migrated.public_key_ring().get(peer.x_pub_key()).unwrap();
        assert!(other.is_temporary_request_key);
        assert_ne!(other.request_pub_key, peer.request_pub_key());
    }

    #[test]
    fn test_bad_peer_key_fails_migration() {
        let me = Credentials::create(Network::Test).unwrap();
        let mut wallet = legacy(me.x_priv_key().unwrap(), &[&me]);
        wallet.public_key_ring.copayers_ext_pub_keys.push("tpubgarbage".to_string());

        assert!(matches!(Credentials::from_legacy(&wallet), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_legacy_json() {
        let json = r#"{
            "privateKey": { "extendedPrivateKeyString": "xprv" },
            "publicKeyRing": { "copayersExtPubKeys": ["a", "b"] }
        }"#;
        let wallet = LegacyWallet::from_json(json).unwrap();
        assert_eq!(wallet.public_key_ring.copayers_ext_pub_keys, vec!["a", "b"]);
        assert!(LegacyWallet::from_json("{}").is_err());
    }
}
