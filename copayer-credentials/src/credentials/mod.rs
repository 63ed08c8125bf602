//! Copayer credentials
//!
//! A [`Credentials`] value holds everything one participant of a multisig HD
//! wallet needs locally: its root keys, the request key pair used to
//! authenticate against the wallet service, derived encryption keys, and the
//! public key ring of the group.
//!
//! Every construction path that starts from key material goes through
//! [`expand`], so derived fields always agree with the root they came from.

mod compact;
mod legacy;
mod ring;
mod schema;

pub use legacy::{LegacyPrivateKey, LegacyPublicKeyRing, LegacyWallet};
pub use ring::{PublicKeyRing, PublicKeyRingEntry};
pub use schema::CredentialsRecord;

use rand::{rngs::OsRng, RngCore};
use tracing::{debug, info, warn};

use crate::config::CREDENTIALS_VERSION;
use crate::crypto::keys::{self, bitcoin as encoding, Network, BASE_ADDRESS_DERIVATION, REQUEST_KEY};
use crate::crypto::mnemonic::{generate_mnemonic, mnemonic_to_seed, MnemonicStrength};
use crate::crypto::symmetric::{private_key_to_aes_key, xpub_to_copayer_id};
use crate::error::{Error, Result};

/// Seed length for freshly generated master keys
const SEED_BYTES: usize = 32;

/// How a credential came into existence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Fresh random or mnemonic master key
    Generated,
    /// Imported from an extended private key
    ImportedPrivate,
    /// Imported from an extended public key and a request private key
    ImportedPublic,
    /// Converted from a legacy single-root wallet
    MigratedLegacy,
    /// Restored from the full persisted form
    Deserialized,
    /// Restored from the compact export
    CompactImported,
}

/// Root key material a credential is expanded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootMaterial {
    /// Master extended private key; everything else is derivable
    Private { x_priv_key: String },
    /// Watch-only root; the request key cannot be derived and must be supplied
    Public { x_pub_key: String, request_priv_key: String },
}

/// Fields derived from a [`RootMaterial`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedKeys {
    pub network: Network,
    pub x_pub_key: String,
    pub request_priv_key: String,
    pub request_pub_key: String,
    pub personal_encrypting_key: String,
    pub copayer_id: String,
}

/// Derive every dependent field from root key material.
///
/// When `asserted_network` is given it must match the network encoded in the
/// resulting extended public key, otherwise [`Error::State`] is returned.
pub fn expand(root: &RootMaterial, asserted_network: Option<Network>) -> Result<ExpandedKeys> {
    let (x_pub_key, request_key) = match root {
        RootMaterial::Private { x_priv_key } => {
            let master = keys::parse_xpriv(x_priv_key)?;
            let address = keys::neuter(&keys::derive_private(&master, BASE_ADDRESS_DERIVATION)?);
            let request = keys::derive_private(&master, REQUEST_KEY)?;
            (address.to_string(), request.private_key)
        }
        RootMaterial::Public { x_pub_key, request_priv_key } => {
            let request_key = encoding::parse_private_key(request_priv_key)?;
            (x_pub_key.clone(), request_key)
        }
    };
    let network = keys::network_from_xpub(&x_pub_key)?;

    if let Some(asserted) = asserted_network {
        if asserted != network {
            warn!(%asserted, inferred = %network, "Network mismatch between credential and extended public key");
            return Err(Error::State(format!(
                "Network {} does not match extended public key network {}",
                asserted, network
            )));
        }
    }

    let request_priv_key = encoding::private_key_to_hex(&request_key);
    let request_pub_key = encoding::public_key_to_hex(&encoding::public_key_from_private(&request_key));
    let personal_encrypting_key = private_key_to_aes_key(&request_priv_key)?;
    let copayer_id = xpub_to_copayer_id(&x_pub_key);

    debug!(%copayer_id, %network, "Expanded credential keys");

    Ok(ExpandedKeys {
        network,
        x_pub_key,
        request_priv_key,
        request_pub_key,
        personal_encrypting_key,
        copayer_id,
    })
}

/// Key material and group context of one copayer
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    version: String,
    origin: Origin,
    network: Network,
    x_priv_key: Option<String>,
    x_pub_key: String,
    request_priv_key: Option<String>,
    request_pub_key: String,
    copayer_id: String,
    personal_encrypting_key: String,
    public_key_ring: PublicKeyRing,
    wallet_id: Option<String>,
    wallet_name: Option<String>,
    copayer_name: Option<String>,
    m: Option<u32>,
    n: Option<u32>,
    wallet_priv_key: Option<String>,
    shared_encrypting_key: Option<String>,
}

impl Credentials {
    fn from_expanded(origin: Origin, x_priv_key: Option<String>, expanded: ExpandedKeys) -> Self {
        Self {
            version: CREDENTIALS_VERSION.to_string(),
            origin,
            network: expanded.network,
            x_priv_key,
            x_pub_key: expanded.x_pub_key,
            request_priv_key: Some(expanded.request_priv_key),
            request_pub_key: expanded.request_pub_key,
            copayer_id: expanded.copayer_id,
            personal_encrypting_key: expanded.personal_encrypting_key,
            public_key_ring: PublicKeyRing::default(),
            wallet_id: None,
            wallet_name: None,
            copayer_name: None,
            m: None,
            n: None,
            wallet_priv_key: None,
            shared_encrypting_key: None,
        }
    }

    /// Build credentials from root key material, optionally asserting the network
    pub fn from_root(root: RootMaterial, asserted_network: Option<Network>) -> Result<Self> {
        let expanded = expand(&root, asserted_network)?;
        let credentials = match root {
            RootMaterial::Private { x_priv_key } => {
                Self::from_expanded(Origin::ImportedPrivate, Some(x_priv_key), expanded)
            }
            RootMaterial::Public { .. } => Self::from_expanded(Origin::ImportedPublic, None, expanded),
        };
        info!(copayer_id = %credentials.copayer_id, origin = ?credentials.origin, "Credentials created");
        Ok(credentials)
    }

    /// Generate credentials from a fresh random master key
    pub fn create(network: Network) -> Result<Self> {
        let mut seed = [0u8; SEED_BYTES];
        OsRng.fill_bytes(&mut seed);
        Self::from_seed(network, &seed)
    }

    /// Generate credentials from a BIP39 mnemonic and optional passphrase
    pub fn from_mnemonic(network: Network, phrase: &str, passphrase: Option<&str>) -> Result<Self> {
        let seed = mnemonic_to_seed(phrase, passphrase)?;
        Self::from_seed(network, &seed)
    }

    /// Generate credentials from a new random mnemonic.
    ///
    /// Returns the credentials together with the phrase, which is the only
    /// way to recover the master key later.
    pub fn generate_with_mnemonic(
        network: Network,
        strength: MnemonicStrength,
        passphrase: Option<&str>,
    ) -> Result<(Self, String)> {
        let phrase = generate_mnemonic(strength)?;
        let credentials = Self::from_mnemonic(network, &phrase, passphrase)?;
        Ok((credentials, phrase))
    }

    fn from_seed(network: Network, seed: &[u8]) -> Result<Self> {
        let master = keys::master_from_seed(network, seed)?;
        let root = RootMaterial::Private { x_priv_key: master.to_string() };
        let mut credentials = Self::from_root(root, Some(network))?;
        credentials.origin = Origin::Generated;
        Ok(credentials)
    }

    /// Import signing credentials from a master extended private key
    pub fn from_extended_private_key(x_priv_key: &str) -> Result<Self> {
        Self::from_root(RootMaterial::Private { x_priv_key: x_priv_key.to_string() }, None)
    }

    /// Import watch-only credentials from an extended public key and request private key
    pub fn from_extended_public_key(x_pub_key: &str, request_priv_key: &str) -> Result<Self> {
        Self::from_root(
            RootMaterial::Public {
                x_pub_key: x_pub_key.to_string(),
                request_priv_key: request_priv_key.to_string(),
            },
            None,
        )
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn x_priv_key(&self) -> Option<&str> {
        self.x_priv_key.as_deref()
    }

    pub fn x_pub_key(&self) -> &str {
        &self.x_pub_key
    }

    pub fn request_priv_key(&self) -> Option<&str> {
        self.request_priv_key.as_deref()
    }

    pub fn request_pub_key(&self) -> &str {
        &self.request_pub_key
    }

    pub fn copayer_id(&self) -> &str {
        &self.copayer_id
    }

    pub fn personal_encrypting_key(&self) -> &str {
        &self.personal_encrypting_key
    }

    pub fn public_key_ring(&self) -> &PublicKeyRing {
        &self.public_key_ring
    }

    pub fn wallet_id(&self) -> Option<&str> {
        self.wallet_id.as_deref()
    }

    pub fn wallet_name(&self) -> Option<&str> {
        self.wallet_name.as_deref()
    }

    pub fn copayer_name(&self) -> Option<&str> {
        self.copayer_name.as_deref()
    }

    /// Required signatures
    pub fn m(&self) -> Option<u32> {
        self.m
    }

    /// Total copayers
    pub fn n(&self) -> Option<u32> {
        self.n
    }

    pub fn wallet_priv_key(&self) -> Option<&str> {
        self.wallet_priv_key.as_deref()
    }

    pub fn shared_encrypting_key(&self) -> Option<&str> {
        self.shared_encrypting_key.as_deref()
    }

    /// Whether the master private key is held
    pub fn can_sign(&self) -> bool {
        self.x_priv_key.is_some()
    }

    /// Ring entry describing this copayer
    pub fn self_ring_entry(&self) -> PublicKeyRingEntry {
        PublicKeyRingEntry::new(&self.x_pub_key, &self.request_pub_key)
    }

    /// Bind the credentials to a group wallet.
    ///
    /// A single-signer wallet gets its ring seeded with this copayer right
    /// away; larger wallets fill the ring through [`Self::set_public_key_ring`].
    pub fn add_wallet_info(
        &mut self,
        wallet_id: &str,
        wallet_name: &str,
        m: u32,
        n: u32,
        wallet_priv_key: Option<&str>,
        copayer_name: &str,
    ) -> Result<()> {
        let shared_encrypting_key = wallet_priv_key.map(private_key_to_aes_key).transpose()?;

        self.wallet_id = Some(wallet_id.to_string());
        self.wallet_name = Some(wallet_name.to_string());
        self.m = Some(m);
        self.n = Some(n);
        self.wallet_priv_key = wallet_priv_key.map(str::to_string);
        self.shared_encrypting_key = shared_encrypting_key;
        self.copayer_name = Some(copayer_name.to_string());

        if n == 1 {
            let entry = self.self_ring_entry();
            self.set_public_key_ring(&[entry]);
        }

        info!(copayer_id = %self.copayer_id, %wallet_id, m, n, "Wallet info attached");
        Ok(())
    }

    /// Whether the credentials are bound to a wallet
    pub fn has_wallet_info(&self) -> bool {
        self.wallet_id.as_deref().map_or(false, |id| !id.is_empty())
    }

    /// Replace the ring with a copy of `entries`
    pub fn set_public_key_ring(&mut self, entries: &[PublicKeyRingEntry]) {
        self.public_key_ring = PublicKeyRing::from_entries(entries.iter().cloned());
    }

    /// Upgrade temporary request keys that `candidates` publishes as permanent.
    ///
    /// Returns the number of upgraded entries.
    pub fn reconcile_public_key_ring(&mut self, candidates: &[PublicKeyRingEntry]) -> usize {
        let upgraded = self.public_key_ring.reconcile(candidates);
        if upgraded > 0 {
            debug!(copayer_id = %self.copayer_id, upgraded, "Temporary request keys upgraded");
        }
        upgraded
    }

    /// Whether `m` and `n` are set and the ring holds exactly `n` copayers
    pub fn is_complete(&self) -> bool {
        match (self.m, self.n) {
            (Some(m), Some(n)) if m > 0 && n > 0 => self.public_key_ring.len() == n as usize,
            _ => false,
        }
    }

    /// `None` while incomplete, otherwise whether any ring entry is still temporary
    pub fn has_temporary_request_keys(&self) -> Option<bool> {
        if !self.is_complete() {
            return None;
        }
        Some(self.public_key_ring.has_temporary())
    }
}
