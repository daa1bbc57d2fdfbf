//! Stable hashing helpers for run manifests and output digests.

use blake3::Hasher;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(64);
        for b in &self.0 {
            use std::fmt::Write as _;
            let _ = write!(&mut s, "{:02x}", b);
        }
        s
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

pub fn hash_bytes(bytes: &[u8]) -> Hash256 {
    let mut h = Hasher::new();
    h.update(bytes);
    Hash256(h.finalize().into())
}

/// Hash any serde-serializable value deterministically (via JSON).
pub fn hash_serde<T: Serialize>(v: &T) -> Result<Hash256, crate::error::Error> {
    let bytes = serde_json::to_vec(v)?;
    Ok(hash_bytes(&bytes))
}

/// Incremental digest over a sequence of serializable items, so a stream can
/// be fingerprinted without collecting it first.
#[derive(Default)]
pub struct StreamDigest {
    hasher: Hasher,
    items: u64,
}

impl StreamDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update<T: Serialize>(&mut self, item: &T) -> Result<(), crate::error::Error> {
        let bytes = serde_json::to_vec(item)?;
        // Length prefix keeps item boundaries unambiguous.
        self.hasher.update(&(bytes.len() as u64).to_le_bytes());
        self.hasher.update(&bytes);
        self.items += 1;
        Ok(())
    }

    pub fn items(&self) -> u64 {
        self.items
    }

    pub fn finish(&self) -> Hash256 {
        Hash256(self.hasher.finalize().into())
    }
}
