//! Key derivation and key encodings
//!
//! This module wraps the BIP32 derivation paths and the string forms used for
//! extended keys, request keys and wallet secrets.

pub mod bitcoin;
mod derivation;

pub use derivation::*;
