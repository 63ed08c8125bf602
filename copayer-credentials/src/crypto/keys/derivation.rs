//! Hierarchical deterministic derivation over fixed protocol paths

use std::fmt;
use std::str::FromStr;

use bitcoin::bip32::{DerivationPath, Xpriv, Xpub};
use secp256k1::Secp256k1;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Path of the address subtree whose public key is shared with the group
pub const BASE_ADDRESS_DERIVATION: &str = "m/45'";

/// Path of the request authentication key
pub const REQUEST_KEY: &str = "m/1'/0";

/// Public-only path used to build placeholder request keys for peers
pub const TMP_REQUEST_KEY: &str = "m/1/1";

/// Networks a credential can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    /// Bitcoin mainnet
    #[serde(rename = "livenet")]
    Main,
    /// Bitcoin testnet
    #[serde(rename = "testnet")]
    Test,
}

impl Network {
    /// Name used in the persisted form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "livenet",
            Self::Test => "testnet",
        }
    }

    pub(crate) fn to_bitcoin(self) -> bitcoin::Network {
        match self {
            Self::Main => bitcoin::Network::Bitcoin,
            Self::Test => bitcoin::Network::Testnet,
        }
    }

    pub(crate) fn from_bitcoin(network: bitcoin::Network) -> Self {
        match network {
            bitcoin::Network::Bitcoin => Self::Main,
            // Testnet, signet and regtest share the tpub version bytes
            _ => Self::Test,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "livenet" | "mainnet" | "main" => Ok(Self::Main),
            "testnet" | "test" => Ok(Self::Test),
            other => Err(Error::Validation(format!("Unknown network: {}", other))),
        }
    }
}

/// Parse an extended private key from its base58 string form
pub fn parse_xpriv(s: &str) -> Result<Xpriv> {
    Xpriv::from_str(s).map_err(|e| Error::InvalidKey(format!("Invalid extended private key: {}", e)))
}

/// Parse an extended public key from its base58 string form
pub fn parse_xpub(s: &str) -> Result<Xpub> {
    Xpub::from_str(s).map_err(|e| Error::InvalidKey(format!("Invalid extended public key: {}", e)))
}

fn parse_path(path: &str) -> Result<DerivationPath> {
    DerivationPath::from_str(path)
        .map_err(|e| Error::KeyDerivation(format!("Invalid derivation path {}: {}", path, e)))
}

/// Build a master extended private key from seed bytes
pub fn master_from_seed(network: Network, seed: &[u8]) -> Result<Xpriv> {
    Ok(Xpriv::new_master(network.to_bitcoin(), seed)?)
}

/// Derive a private child along `path`
pub fn derive_private(xpriv: &Xpriv, path: &str) -> Result<Xpriv> {
    let secp = Secp256k1::new();
    let path = parse_path(path)?;
    Ok(xpriv.derive_priv(&secp, &path)?)
}

/// Derive a public child along `path`; hardened steps are rejected
pub fn derive_public(xpub: &Xpub, path: &str) -> Result<Xpub> {
    let secp = Secp256k1::new();
    let path = parse_path(path)?;
    Ok(xpub.derive_pub(&secp, &path)?)
}

/// The public counterpart of an extended private key
pub fn neuter(xpriv: &Xpriv) -> Xpub {
    let secp = Secp256k1::new();
    Xpub::from_priv(&secp, xpriv)
}

/// Infer the network from the version bytes of an encoded extended public key
pub fn network_from_xpub(x_pub_key: &str) -> Result<Network> {
    let xpub = parse_xpub(x_pub_key)?;
    Ok(Network::from_bitcoin(xpub.network))
}

#[cfg(test)]
mod tests {
    use super::*;

    const XPRV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";

    #[test]
    fn test_fixed_paths_parse() {
        for path in [BASE_ADDRESS_DERIVATION, REQUEST_KEY, TMP_REQUEST_KEY] {
            assert!(parse_path(path).is_ok(), "{}", path);
        }
    }

    #[test]
    fn test_network_inference() {
        let master = parse_xpriv(XPRV).unwrap();
        let xpub = neuter(&master).to_string();
        assert!(xpub.starts_with("xpub"));
        assert_eq!(network_from_xpub(&xpub).unwrap(), Network::Main);

        let test_master = master_from_seed(Network::Test, &[7u8; 32]).unwrap();
        let tpub = neuter(&test_master).to_string();
        assert!(tpub.starts_with("tpub"));
        assert_eq!(network_from_xpub(&tpub).unwrap(), Network::Test);
    }

    #[test]
    fn test_public_derivation_matches_private() {
        let master = parse_xpriv(XPRV).unwrap();
        let from_private = neuter(&derive_private(&master, TMP_REQUEST_KEY).unwrap());
        let from_public = derive_public(&neuter(&master), TMP_REQUEST_KEY).unwrap();
        assert_eq!(from_private.public_key, from_public.public_key);
    }

    #[test]
    fn test_hardened_public_derivation_fails() {
        let master = parse_xpriv(XPRV).unwrap();
        let result = derive_public(&neuter(&master), BASE_ADDRESS_DERIVATION);
        assert!(matches!(result, Err(Error::KeyDerivation(_))));
    }

    #[test]
    fn test_network_names() {
        assert_eq!("livenet".parse::<Network>().unwrap(), Network::Main);
        assert_eq!("testnet".parse::<Network>().unwrap(), Network::Test);
        assert!("regtest".parse::<Network>().is_err());
        assert_eq!(serde_json::to_string(&Network::Test).unwrap(), "\"testnet\"");
    }
}
