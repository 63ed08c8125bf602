//! Bitcoin key string forms

use secp256k1::{PublicKey, Secp256k1, SecretKey};

use crate::error::{Error, Result};
use super::derivation::Network;

/// Parse a private key given as 64 hex characters or in wallet import format
pub fn parse_private_key(s: &str) -> Result<SecretKey> {
    if s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit()) {
        let bytes = hex::decode(s)
            .map_err(|e| Error::InvalidKey(format!("Invalid private key hex: {}", e)))?;
        return SecretKey::from_slice(&bytes)
            .map_err(|e| Error::InvalidKey(format!("Invalid private key: {}", e)));
    }

    let key = bitcoin::PrivateKey::from_wif(s)
        .map_err(|e| Error::InvalidKey(format!("Invalid WIF private key: {}", e)))?;
    Ok(key.inner)
}

/// Hex string form of a private key
pub fn private_key_to_hex(secret_key: &SecretKey) -> String {
    hex::encode(secret_key.secret_bytes())
}

/// Compressed wallet import format for `network`
pub fn private_key_to_wif(secret_key: &SecretKey, network: Network) -> String {
    bitcoin::PrivateKey::new(*secret_key, network.to_bitcoin()).to_wif()
}

/// Public key matching a private key
pub fn public_key_from_private(secret_key: &SecretKey) -> PublicKey {
    let secp = Secp256k1::new();
    PublicKey::from_secret_key(&secp, secret_key)
}

/// Compressed hex string form of a public key
pub fn public_key_to_hex(public_key: &PublicKey) -> String {
    hex::encode(public_key.serialize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET_HEX: &str = "0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d";

    #[test]
    fn test_hex_and_wif_agree() {
        let key = parse_private_key(SECRET_HEX).unwrap();
        assert_eq!(private_key_to_hex(&key), SECRET_HEX);

        let wif = private_key_to_wif(&key, Network::Main);
        assert!(wif.starts_with('K') || wif.starts_with('L'));
        let from_wif = parse_private_key(&wif).unwrap();
        assert_eq!(from_wif, key);

        let test_wif = private_key_to_wif(&key, Network::Test);
        assert!(test_wif.starts_with('c'));
        assert_eq!(parse_private_key(&test_wif).unwrap(), key);
    }

    #[test]
    fn test_public_key_hex_is_compressed() {
        let key = parse_private_key(SECRET_HEX).unwrap();
        let public_key = public_key_to_hex(&public_key_from_private(&key));
        assert_eq!(public_key.len(), 66);
        assert!(public_key.starts_with("02") || public_key.starts_with("03"));
    }

    #[test]
    fn test_garbage_private_key() {
        assert!(matches!(parse_private_key("not a key"), Err(Error::InvalidKey(_))));
        assert!(parse_private_key(&"0".repeat(64)).is_err());
    }
}
