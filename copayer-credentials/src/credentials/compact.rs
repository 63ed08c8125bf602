//! Compact versioned export for out-of-band transfer
//!
//! The export is a JSON array with a fixed position per field:
//!
//! `[version, xPrivKey, requestPrivKey, xPubKey, m, n, publicKeyRing, sharedEncryptingKey]`
//!
//! Signing credentials leave `requestPrivKey` and `xPubKey` empty since both
//! are derived again from `xPrivKey`. The ring omits this copayer's own entry,
//! which is appended back on import. Wallet id and names are not carried.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::CredentialsConfig;
use crate::crypto::keys::bitcoin as encoding;
use crate::error::{Error, Result};
use super::{Credentials, Origin, PublicKeyRing, PublicKeyRingEntry, RootMaterial};

/// Positional layout of the compact export
#[derive(Debug, Serialize, Deserialize)]
struct CompactPayload(
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<u32>,
    Option<u32>,
    Vec<PublicKeyRingEntry>,
    Option<String>,
);

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Credentials {
    /// Encode the credentials in the compact positional form
    pub fn export_compact(&self) -> Result<String> {
        let (request_priv_key, x_pub_key) = if self.can_sign() {
            (String::new(), String::new())
        } else {
            let request_priv_key = self.request_priv_key.as_deref().ok_or_else(|| {
                Error::Validation("Watch-only credentials without a request private key cannot be exported".to_string())
            })?;
            let secret_key = encoding::parse_private_key(request_priv_key)?;
            (encoding::private_key_to_wif(&secret_key, self.network), self.x_pub_key.clone())
        };

        let payload = CompactPayload(
            self.version.clone(),
            self.x_priv_key.clone(),
            Some(request_priv_key),
            Some(x_pub_key),
            self.m,
            self.n,
            self.public_key_ring.without(&self.x_pub_key),
            self.shared_encrypting_key.clone(),
        );

        serde_json::to_string(&payload).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Restore credentials from the compact form using the default configuration
    pub fn import_compact(compact: &str) -> Result<Self> {
        Self::import_compact_with(compact, &CredentialsConfig::default())
    }

    /// Restore credentials from the compact form, accepting the versions in `config`
    pub fn import_compact_with(compact: &str, config: &CredentialsConfig) -> Result<Self> {
        let CompactPayload(version, x_priv_key, request_priv_key, x_pub_key, m, n, ring, shared_encrypting_key) =
            serde_json::from_str(compact)
                .map_err(|e| Error::Format(format!("Invalid compressed format: {}", e)))?;

        if !config.accepts_compact_version(&version) {
            warn!(%version, "Rejecting compact credentials with unsupported version");
            return Err(Error::Format(format!("Unsupported compact format version: {}", version)));
        }

        let root = match (non_empty(x_priv_key), non_empty(x_pub_key), non_empty(request_priv_key)) {
            (Some(x_priv_key), _, _) => RootMaterial::Private { x_priv_key },
            (None, Some(x_pub_key), Some(request_priv_key)) => RootMaterial::Public { x_pub_key, request_priv_key },
            (None, Some(_), None) => {
                return Err(Error::Validation("Watch-only export is missing its request private key".to_string()))
            }
            (None, None, _) => {
                return Err(Error::Validation("Compact export has neither xPrivKey nor xPubKey".to_string()))
            }
        };

        let mut credentials = Self::from_root(root, None)?;
        credentials.origin = Origin::CompactImported;
        credentials.version = version;
        credentials.m = m;
        credentials.n = n;
        credentials.shared_encrypting_key = shared_encrypting_key;

        let mut public_key_ring = PublicKeyRing::from(ring);
        public_key_ring.push(credentials.self_ring_entry());
        credentials.public_key_ring = public_key_ring;

        info!(copayer_id = %credentials.copayer_id, can_sign = credentials.can_sign(), "Credentials imported from compact form");
        Ok(credentials)
    }
}
