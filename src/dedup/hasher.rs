use sha2::{Digest, Sha256};

/// Stable content digest for exact-duplicate detection.
///
/// Case and whitespace are normalized first, so `"KES  5,000"` and
/// `"kes 5,000"` hash the same. The digest is SHA-256, hex encoded, and does
/// not change across process restarts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentHasher;

impl ContentHasher {
    pub fn new() -> Self {
        Self
    }

    pub fn hash(&self, message: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(normalize(message).as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Lowercases and collapses every whitespace run to a single space.
pub fn normalize(message: &str) -> String {
    message
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
