//! Password hashing
//!
//! Salted SHA-256, stored as `hex(salt)$hex(digest)`.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Hash a password with a fresh random salt
pub fn hash(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    format!("{}${}", hex::encode(salt), hex::encode(digest(&salt, password)))
}

/// Verify a password against a stored `salt$digest` pair
pub fn verify(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(expected) = hex::decode(digest_hex) else {
        return false;
    };

    let actual = digest(&salt, password);
    // Fixed-length comparison over the decoded digest
    actual.len() == expected.len()
        && actual
            .iter()
            .zip(expected.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

fn digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let stored = hash("secret1");
        assert!(verify("secret1", &stored));
        assert!(!verify("secret2", &stored));
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(hash("secret1"), hash("secret1"));
    }

    #[test]
    fn malformed_stored_value_never_verifies() {
        assert!(!verify("secret1", ""));
        assert!(!verify("secret1", "no-separator"));
        assert!(!verify("secret1", "nothex$nothex"));
    }
}
