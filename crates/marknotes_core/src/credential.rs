//! Per-profile credential hashing.
//!
//! # Responsibility
//! - Produce and verify salted credential hashes stored on roster rows.
//!
//! # Invariants
//! - Stored form is `salt_hex$digest_hex`; the raw credential never leaves
//!   this module and is never logged.
//! - Hashing the same credential twice yields different stored values
//!   (fresh random salt per hash).

use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Hashes one credential with a fresh random salt.
pub fn hash_credential(credential: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt_hex = hex::encode(salt);
    let digest = digest_hex(&salt_hex, credential);
    format!("{salt_hex}${digest}")
}

/// Verifies one credential against a stored `salt_hex$digest_hex` value.
///
/// Malformed stored values verify as `false` rather than erroring; a
/// corrupt hash must never grant access.
pub fn verify_credential(credential: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt_hex, digest)) => digest == digest_hex(salt_hex, credential),
        None => false,
    }
}

fn digest_hex(salt_hex: &str, credential: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(b":");
    hasher.update(credential.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::{hash_credential, verify_credential};

    #[test]
    fn hash_and_verify_roundtrip() {
        let stored = hash_credential("password123");
        assert!(verify_credential("password123", &stored));
        assert!(!verify_credential("password124", &stored));
    }

    #[test]
    fn same_credential_hashes_to_distinct_values() {
        let first = hash_credential("password123");
        let second = hash_credential("password123");
        assert_ne!(first, second);
        assert!(verify_credential("password123", &first));
        assert!(verify_credential("password123", &second));
    }

    #[test]
    fn malformed_stored_value_never_verifies() {
        assert!(!verify_credential("password123", ""));
        assert!(!verify_credential("password123", "no-separator"));
        assert!(!verify_credential("password123", "deadbeef$"));
    }
}
