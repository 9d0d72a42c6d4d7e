//! Password hashing seam
//!
//! User flows treat hashing as an opaque primitive behind the
//! [`PasswordHasher`] trait, so the algorithm can be swapped without
//! touching the services. The bundled implementation is salted SHA-256.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Opaque hash/verify primitive for user passwords.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into an opaque stored form.
    fn hash(&self, plaintext: &str) -> String;

    /// Verify a plaintext password against a stored hash.
    fn verify(&self, plaintext: &str, stored: &str) -> bool;
}

/// Salted SHA-256 password hasher.
///
/// Stored form is `base64(salt)$base64(sha256(salt || password))` with a
/// random 16-byte salt per hash.
///
/// # Examples
///
/// ```
/// use campus_services::{PasswordHasher, SaltedSha256Hasher};
///
/// let hasher = SaltedSha256Hasher::new();
/// let stored = hasher.hash("s3cret");
/// assert!(hasher.verify("s3cret", &stored));
/// assert!(!hasher.verify("wrong", &stored));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SaltedSha256Hasher;

impl SaltedSha256Hasher {
    /// Create a new hasher.
    pub fn new() -> Self {
        Self
    }

    fn digest(salt: &[u8], plaintext: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(plaintext.as_bytes());
        hasher.finalize().to_vec()
    }
}

impl PasswordHasher for SaltedSha256Hasher {
    fn hash(&self, plaintext: &str) -> String {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);

        let digest = Self::digest(&salt, plaintext);
        format!("{}${}", STANDARD.encode(salt), STANDARD.encode(digest))
    }

    fn verify(&self, plaintext: &str, stored: &str) -> bool {
        let Some((salt_b64, digest_b64)) = stored.split_once('$') else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (STANDARD.decode(salt_b64), STANDARD.decode(digest_b64))
        else {
            return false;
        };
        Self::digest(&salt, plaintext) == expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = SaltedSha256Hasher::new();
        let stored = hasher.hash("adminpass123");

        assert!(hasher.verify("adminpass123", &stored));
        assert!(!hasher.verify("adminpass124", &stored));
    }

    #[test]
    fn test_salts_differ_between_hashes() {
        let hasher = SaltedSha256Hasher::new();
        let a = hasher.hash("same-password");
        let b = hasher.hash("same-password");

        assert_ne!(a, b);
        assert!(hasher.verify("same-password", &a));
        assert!(hasher.verify("same-password", &b));
    }

    #[test]
    fn test_garbage_stored_value_never_verifies() {
        let hasher = SaltedSha256Hasher::new();
        assert!(!hasher.verify("anything", ""));
        assert!(!hasher.verify("anything", "no-separator"));
        assert!(!hasher.verify("anything", "!!!$???"));
    }
}
