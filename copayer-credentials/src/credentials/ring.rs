//! Public key ring of a wallet's copayers

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Public material published by one copayer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyRingEntry {
    /// Extended public key of the copayer's address subtree
    pub x_pub_key: String,
    /// Public key used to authenticate the copayer's requests
    pub request_pub_key: String,
    /// Placeholder request key that the copayer has not confirmed yet
    #[serde(default)]
    pub is_temporary_request_key: bool,
}

impl PublicKeyRingEntry {
    /// An authoritative entry
    pub fn new(x_pub_key: &str, request_pub_key: &str) -> Self {
        Self {
            x_pub_key: x_pub_key.to_string(),
            request_pub_key: request_pub_key.to_string(),
            is_temporary_request_key: false,
        }
    }

    /// A provisional entry awaiting the copayer's real request key
    pub fn temporary(x_pub_key: &str, request_pub_key: &str) -> Self {
        Self {
            is_temporary_request_key: true,
            ..Self::new(x_pub_key, request_pub_key)
        }
    }
}

/// Ordered ring entries, unique by extended public key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PublicKeyRingEntry>", into = "Vec<PublicKeyRingEntry>")]
pub struct PublicKeyRing {
    entries: Vec<PublicKeyRingEntry>,
    positions: HashMap<String, usize>,
}

impl PublicKeyRing {
    /// Build a ring, keeping the first entry for each extended public key
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = PublicKeyRingEntry>,
    {
        let mut ring = Self::default();
        for entry in entries {
            if !ring.push(entry.clone()) {
                warn!(x_pub_key = %entry.x_pub_key, "Dropping duplicate public key ring entry");
            }
        }
        ring
    }

    /// Append an entry; returns `false` if its extended public key is already present
    pub fn push(&mut self, entry: PublicKeyRingEntry) -> bool {
        if self.positions.contains_key(&entry.x_pub_key) {
            return false;
        }
        self.positions.insert(entry.x_pub_key.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PublicKeyRingEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &PublicKeyRingEntry> {
        self.entries.iter()
    }

    /// Entry for an extended public key
    pub fn get(&self, x_pub_key: &str) -> Option<&PublicKeyRingEntry> {
        self.positions.get(x_pub_key).map(|&i| &self.entries[i])
    }

    /// Entries other than the one for `x_pub_key`, in ring order
    pub fn without(&self, x_pub_key: &str) -> Vec<PublicKeyRingEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.x_pub_key != x_pub_key)
            .cloned()
            .collect()
    }

    /// Whether any entry still carries a temporary request key
    pub fn has_temporary(&self) -> bool {
        self.entries.iter().any(|entry| entry.is_temporary_request_key)
    }

    /// Replace temporary request keys with permanent ones found in `candidates`.
    ///
    /// Entries are never added, removed or reordered. Returns the number of
    /// upgraded entries.
    pub fn reconcile(&mut self, candidates: &[PublicKeyRingEntry]) -> usize {
        let mut by_key: HashMap<&str, &PublicKeyRingEntry> = HashMap::new();
        for candidate in candidates {
            by_key.entry(candidate.x_pub_key.as_str()).or_insert(candidate);
        }

        let mut upgraded = 0;
        for entry in self.entries.iter_mut().filter(|e| e.is_temporary_request_key) {
            match by_key.get(entry.x_pub_key.as_str()) {
                Some(candidate) if !candidate.is_temporary_request_key => {
                    entry.request_pub_key = candidate.request_pub_key.clone();
                    entry.is_temporary_request_key = false;
                    upgraded += 1;
                }
                _ => {}
            }
        }
        upgraded
    }
}

impl From<Vec<PublicKeyRingEntry>> for PublicKeyRing {
    fn from(entries: Vec<PublicKeyRingEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<PublicKeyRing> for Vec<PublicKeyRingEntry> {
    fn from(ring: PublicKeyRing) -> Self {
        ring.entries
    }
}
