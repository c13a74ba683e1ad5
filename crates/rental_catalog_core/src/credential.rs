//! Credential hashing collaborator.
//!
//! # Responsibility
//! - Turn plaintext passwords into opaque hashes and verify them later.
//!
//! # Invariants
//! - Plaintext never leaves this module in stored or logged form.
//! - `verify` never panics on malformed hashes; it returns `false`.

use sha2::{Digest, Sha256};
use uuid::Uuid;

const SHA256_SCHEME: &str = "sha256";

/// Hashing service consumed by the catalog when users set a password.
pub trait CredentialHasher: Send + Sync {
    /// Produces an opaque, self-describing hash for `plaintext`.
    fn hash(&self, plaintext: &str) -> String;
    /// Checks `plaintext` against a hash previously produced by `hash`.
    fn verify(&self, hash: &str, plaintext: &str) -> bool;
}

/// Salted SHA-256 hasher.
///
/// Hash format: `sha256$<salt>$<hex digest>`, salt is a random v4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256CredentialHasher;

impl CredentialHasher for Sha256CredentialHasher {
    fn hash(&self, plaintext: &str) -> String {
        let salt = Uuid::new_v4().simple().to_string();
        let digest = salted_digest(&salt, plaintext);
        format!("{SHA256_SCHEME}${salt}${digest}")
    }

    fn verify(&self, hash: &str, plaintext: &str) -> bool {
        let mut parts = hash.splitn(3, '$');
        let (Some(scheme), Some(salt), Some(expected)) = (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        if scheme != SHA256_SCHEME || salt.is_empty() {
            return false;
        }

        constant_time_eq(salted_digest(salt, plaintext).as_bytes(), expected.as_bytes())
    }
}

fn salted_digest(salt: &str, plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"$");
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
