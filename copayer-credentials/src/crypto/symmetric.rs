//! Symmetric encryption keys and copayer identifiers
//!
//! Both are deterministic digests: a private key maps to a 128-bit AES key
//! (base64, first 16 bytes of its SHA-256), and an extended public key string
//! maps to the hex SHA-256 used as the copayer identifier.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};

use crate::error::Result;
use super::keys::bitcoin::parse_private_key;

/// AES key length in bytes
const AES_KEY_LEN: usize = 16;

/// Derive the base64 AES key for a private key in hex or WIF form
pub fn private_key_to_aes_key(private_key: &str) -> Result<String> {
    let secret_key = parse_private_key(private_key)?;
    let digest = Sha256::digest(secret_key.secret_bytes());
    Ok(STANDARD.encode(&digest[..AES_KEY_LEN]))
}

/// Stable identifier of the copayer owning `x_pub_key`
pub fn xpub_to_copayer_id(x_pub_key: &str) -> String {
    hex::encode(Sha256::digest(x_pub_key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET_HEX: &str = "0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d";

    #[test]
    fn test_aes_key_shape() {
        let key = private_key_to_aes_key(SECRET_HEX).unwrap();
        let raw = STANDARD.decode(&key).unwrap();
        assert_eq!(raw.len(), AES_KEY_LEN);
        assert_eq!(key, private_key_to_aes_key(SECRET_HEX).unwrap());
    }

    #[test]
    fn test_aes_key_ignores_encoding() {
        let secret_key = parse_private_key(SECRET_HEX).unwrap();
        let wif = crate::crypto::keys::bitcoin::private_key_to_wif(
            &secret_key,
            crate::crypto::keys::Network::Test,
        );
        assert_eq!(private_key_to_aes_key(&wif).unwrap(), private_key_to_aes_key(SECRET_HEX).unwrap());
    }

    #[test]
    fn test_copayer_id() {
        // sha256("abc")
        assert_eq!(
            xpub_to_copayer_id("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
