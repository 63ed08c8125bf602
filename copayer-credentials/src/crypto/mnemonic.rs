//! BIP39 recovery phrases for master keys

use std::str::FromStr;

use bip39::Mnemonic;
use rand::{rngs::OsRng, RngCore};
use crate::error::{Error, Result};

/// Length of a generated recovery phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicStrength {
    /// 12 words (128 bits)
    Words12,
    /// 24 words (256 bits)
    Words24,
}

impl MnemonicStrength {
    /// Strength for a phrase of `words` words
    pub fn from_words(words: usize) -> Result<Self> {
        match words {
            12 => Ok(Self::Words12),
            24 => Ok(Self::Words24),
            other => Err(Error::Mnemonic(format!("Unsupported phrase length: {} words", other))),
        }
    }

    pub fn words(&self) -> usize {
        match self {
            Self::Words12 => 12,
            Self::Words24 => 24,
        }
    }

    fn entropy_bytes(&self) -> usize {
        self.words() / 3 * 4
    }
}

impl FromStr for MnemonicStrength {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let words = s
            .parse::<usize>()
            .map_err(|_| Error::Mnemonic(format!("Invalid phrase length: {}", s)))?;
        Self::from_words(words)
    }
}

/// Random recovery phrase drawn from the OS RNG
pub fn generate_mnemonic(strength: MnemonicStrength) -> Result<String> {
    let mut entropy = vec![0u8; strength.entropy_bytes()];
    OsRng.fill_bytes(&mut entropy);

    Mnemonic::from_entropy(&entropy)
        .map(|mnemonic| mnemonic.to_string())
        .map_err(|e| Error::Mnemonic(e.to_string()))
}

/// Master seed for a phrase and optional passphrase
pub fn mnemonic_to_seed(phrase: &str, passphrase: Option<&str>) -> Result<Vec<u8>> {
    let mnemonic = Mnemonic::parse_normalized(phrase)
        .map_err(|e| Error::Mnemonic(e.to_string()))?;

    Ok(mnemonic.to_seed(passphrase.unwrap_or("")).to_vec())
}
