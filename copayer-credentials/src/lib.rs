//! Copayer credentials for multi-signature HD wallets
//!
//! This library manages the key material of one participant in an m-of-n
//! wallet: deriving the shared extended public key and request key pair from
//! a master key, computing copayer identifiers and encryption keys, tracking
//! the group's public key ring, and the full and compact backup formats.

pub mod error;
pub mod config;
pub mod crypto;
pub mod credentials;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use config::CredentialsConfig;
pub use crypto::keys::Network;
pub use crypto::mnemonic::MnemonicStrength;
pub use credentials::{
    expand, Credentials, CredentialsRecord, ExpandedKeys, LegacyWallet, Origin, PublicKeyRing,
    PublicKeyRingEntry, RootMaterial,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
