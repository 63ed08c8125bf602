//! Error types for copayer credential operations

use thiserror::Error;

/// Custom error type for credential operations
#[derive(Error, Debug)]
pub enum Error {
    /// Required root key material is missing
    #[error("Validation error: {0}")]
    Validation(String),

    /// The credential state contradicts the key material it holds
    #[error("State error: {0}")]
    State(String),

    /// Compact input could not be parsed or has the wrong shape
    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    #[error("Mnemonic error: {0}")]
    Mnemonic(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bitcoin::bip32::Error> for Error {
    fn from(e: bitcoin::bip32::Error) -> Self {
        Error::KeyDerivation(e.to_string())
    }
}

/// Result type for credential operations
pub type Result<T> = std::result::Result<T, Error>;
