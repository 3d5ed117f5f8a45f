use sha2::{Digest, Sha256};

/// Calculate the hex-encoded SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Truncated SHA-256 digest of a string.
///
/// Deterministic across runs and processes, which lets support staff
/// correlate redacted values without recovering them.
pub fn short_digest(input: &str, len: usize) -> String {
    let mut digest = sha256_hex(input.as_bytes());
    digest.truncate(len);
    digest
}
