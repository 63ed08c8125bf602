//! Credential configuration

use crate::crypto::keys::Network;

/// Format version tag carried by credentials and their compact export
pub const CREDENTIALS_VERSION: &str = "1.0.0";

/// Major compact format versions accepted on import by default
pub const SUPPORTED_COMPACT_MAJOR_VERSIONS: &[u64] = &[1];

/// Settings for generating and importing credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialsConfig {
    /// Network used for freshly generated credentials
    pub network: Network,
    /// Accepted major versions of the compact format
    pub compact_versions: Vec<u64>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            network: Network::Main,
            compact_versions: SUPPORTED_COMPACT_MAJOR_VERSIONS.to_vec(),
        }
    }
}

impl CredentialsConfig {
    /// Defaults overridden by `CREDENTIALS_NETWORK` and `CREDENTIALS_COMPACT_VERSIONS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            network: std::env::var("CREDENTIALS_NETWORK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.network),
            compact_versions: std::env::var("CREDENTIALS_COMPACT_VERSIONS")
                .ok()
                .and_then(|v| parse_versions(&v))
                .unwrap_or(defaults.compact_versions),
        }
    }

    /// Whether a compact version tag like `1.0.0` has an accepted major version
    pub fn accepts_compact_version(&self, version: &str) -> bool {
        version
            .split('.')
            .next()
            .and_then(|major| major.trim().parse::<u64>().ok())
            .map_or(false, |major| self.compact_versions.contains(&major))
    }
}

fn parse_versions(value: &str) -> Option<Vec<u64>> {
    let versions: Vec<u64> = value
        .split(',')
        .filter_map(|v| v.trim().parse().ok())
        .collect();
    if versions.is_empty() {
        None
    } else {
        Some(versions)
    }
}
