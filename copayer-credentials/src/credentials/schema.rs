//! Full persisted form of credentials

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::CREDENTIALS_VERSION;
use crate::crypto::keys::Network;
use crate::error::{Error, Result};
use super::{expand, Credentials, Origin, PublicKeyRing, PublicKeyRingEntry, RootMaterial};

/// Every credential field, unredacted, as stored locally
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRecord {
    #[serde(default)]
    pub version: String,
    pub network: Option<Network>,
    pub x_priv_key: Option<String>,
    pub x_pub_key: Option<String>,
    pub request_priv_key: Option<String>,
    pub request_pub_key: Option<String>,
    pub copayer_id: Option<String>,
    #[serde(default)]
    pub public_key_ring: Vec<PublicKeyRingEntry>,
    pub wallet_id: Option<String>,
    pub wallet_name: Option<String>,
    pub m: Option<u32>,
    pub n: Option<u32>,
    pub wallet_priv_key: Option<String>,
    pub personal_encrypting_key: Option<String>,
    pub shared_encrypting_key: Option<String>,
    pub copayer_name: Option<String>,
}

impl CredentialsRecord {
    fn is_fully_derived(&self) -> bool {
        self.network.is_some()
            && self.x_pub_key.is_some()
            && self.request_pub_key.is_some()
            && self.copayer_id.is_some()
            && self.personal_encrypting_key.is_some()
    }

    fn root(&self) -> Result<RootMaterial> {
        match (&self.x_priv_key, &self.x_pub_key, &self.request_priv_key) {
            (Some(x_priv_key), _, _) => Ok(RootMaterial::Private { x_priv_key: x_priv_key.clone() }),
            (None, Some(x_pub_key), Some(request_priv_key)) => Ok(RootMaterial::Public {
                x_pub_key: x_pub_key.clone(),
                request_priv_key: request_priv_key.clone(),
            }),
            (None, Some(_), None) => Err(Error::Validation(
                "Record is missing derived fields and has no request private key".to_string(),
            )),
            (None, None, _) => Err(Error::Validation(
                "Record has neither xPrivKey nor xPubKey".to_string(),
            )),
        }
    }
}

impl Credentials {
    /// Copy every field into the persisted form
    pub fn to_record(&self) -> CredentialsRecord {
        CredentialsRecord {
            version: self.version.clone(),
            network: Some(self.network),
            x_priv_key: self.x_priv_key.clone(),
            x_pub_key: Some(self.x_pub_key.clone()),
            request_priv_key: self.request_priv_key.clone(),
            request_pub_key: Some(self.request_pub_key.clone()),
            copayer_id: Some(self.copayer_id.clone()),
            public_key_ring: self.public_key_ring.entries().to_vec(),
            wallet_id: self.wallet_id.clone(),
            wallet_name: self.wallet_name.clone(),
            m: self.m,
            n: self.n,
            wallet_priv_key: self.wallet_priv_key.clone(),
            personal_encrypting_key: Some(self.personal_encrypting_key.clone()),
            shared_encrypting_key: self.shared_encrypting_key.clone(),
            copayer_name: self.copayer_name.clone(),
        }
    }

    /// Restore credentials from the persisted form.
    ///
    /// Stored fields are trusted as-is. Only when a derived field is missing is
    /// the record expanded from its root to fill the gaps.
    pub fn from_record(mut record: CredentialsRecord) -> Result<Self> {
        if record.x_priv_key.is_none() && record.x_pub_key.is_none() {
            return Err(Error::Validation("Record has neither xPrivKey nor xPubKey".to_string()));
        }

        if !record.is_fully_derived() {
            let keys = expand(&record.root()?, record.network)?;
            record.network = record.network.or(Some(keys.network));
            record.x_pub_key = record.x_pub_key.or(Some(keys.x_pub_key));
            record.request_priv_key = record.request_priv_key.or(Some(keys.request_priv_key));
            record.request_pub_key = record.request_pub_key.or(Some(keys.request_pub_key));
            record.copayer_id = record.copayer_id.or(Some(keys.copayer_id));
            record.personal_encrypting_key =
                record.personal_encrypting_key.or(Some(keys.personal_encrypting_key));
        }

        let credentials = Self {
            version: if record.version.is_empty() {
                CREDENTIALS_VERSION.to_string()
            } else {
                record.version
            },
            origin: Origin::Deserialized,
            network: record.network.unwrap_or(Network::Main),
            x_priv_key: record.x_priv_key,
            x_pub_key: record.x_pub_key.unwrap_or_default(),
            request_priv_key: record.request_priv_key,
            request_pub_key: record.request_pub_key.unwrap_or_default(),
            copayer_id: record.copayer_id.unwrap_or_default(),
            personal_encrypting_key: record.personal_encrypting_key.unwrap_or_default(),
            public_key_ring: PublicKeyRing::from(record.public_key_ring),
            wallet_id: record.wallet_id,
            wallet_name: record.wallet_name,
            copayer_name: record.copayer_name,
            m: record.m,
            n: record.n,
            wallet_priv_key: record.wallet_priv_key,
            shared_encrypting_key: record.shared_encrypting_key,
        };

        info!(copayer_id = %credentials.copayer_id, "Credentials restored from record");
        Ok(credentials)
    }

    /// Full form as a JSON object
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.to_record()).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Restore credentials from a JSON object in the full form
    pub fn from_json(json: &str) -> Result<Self> {
        let record: CredentialsRecord =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XPRV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";

    #[test]
    fn test_record_round_trip() {
        let mut credentials = Credentials::from_extended_private_key(XPRV).unwrap();
        credentials.add_wallet_info("w1", "Solo", 1, 1, None, "alice").unwrap();

        let restored = Credentials::from_record(credentials.to_record()).unwrap();
        assert_eq!(restored.origin(), Origin::Deserialized);
        assert_eq!(restored.to_record(), credentials.to_record());
    }

    #[test]
    fn test_record_requires_a_root() {
        let record = CredentialsRecord {
            copayer_id: Some("abc".to_string()),
            ..Default::default()
        };
        assert!(matches!(Credentials::from_record(record), Err(Error::Validation(_))));
    }

    #[test]
    fn test_record_fields_are_trusted() {
        let credentials = Credentials::from_extended_private_key(XPRV).unwrap();
        let mut record = credentials.to_record();
        record.copayer_id = Some("stored-id".to_string());

        let restored = Credentials::from_record(record).unwrap();
        assert_eq!(restored.copayer_id(), "stored-id");
    }

    #[test]
    fn test_sparse_record_is_completed() {
        let credentials = Credentials::from_extended_private_key(XPRV).unwrap();
        let record = CredentialsRecord {
            x_priv_key: Some(XPRV.to_string()),
            ..Default::default()
        };

        let restored = Credentials::from_record(record).unwrap();
        assert_eq!(restored.x_pub_key(), credentials.x_pub_key());
        assert_eq!(restored.copayer_id(), credentials.copayer_id());
        assert_eq!(restored.network(), Network::Main);
    }

    #[test]
    fn test_json_uses_camel_case_and_keeps_unset_fields() {
        let credentials = Credentials::from_extended_private_key(XPRV).unwrap();
        let json: serde_json::Value = serde_json::from_str(&credentials.to_json().unwrap()).unwrap();

        assert_eq!(json["network"], "livenet");
        assert_eq!(json["xPrivKey"], XPRV);
        assert!(json["walletId"].is_null());
        assert!(json.as_object().unwrap().contains_key("walletId"));
        assert_eq!(json["publicKeyRing"], serde_json::json!([]));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(Credentials::from_json("[1,2"), Err(Error::Serialization(_))));
    }
}
