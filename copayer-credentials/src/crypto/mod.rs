//! Cryptographic primitives used by copayer credentials
//!
//! HD derivation, key string forms, mnemonic seeds, and the deterministic
//! digests behind encryption keys and copayer identifiers.

pub mod mnemonic;
pub mod keys;
pub mod symmetric;

pub use keys::*;
pub use symmetric::*;
