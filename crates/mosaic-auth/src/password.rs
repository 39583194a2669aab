//! Password hashing.
//!
//! Salted, iterated SHA-256 in a self-describing format:
//!
//! ```text
//! sha256-iter$<iterations>$<salt b64url>$<digest b64url>
//! ```
//!
//! Verification reads the iteration count from the stored hash, so the
//! work factor can be raised later without invalidating existing rows.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Hash format tag.
const SCHEME: &str = "sha256-iter";
/// Work factor for newly created hashes.
const ITERATIONS: u32 = 50_000;
/// Salt length in bytes.
const SALT_LEN: usize = 16;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);

    let digest = derive(password.as_bytes(), &salt, ITERATIONS);
    format!(
        "{SCHEME}${ITERATIONS}${}${}",
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(digest)
    )
}

/// Check a password against a stored hash. Malformed hashes verify as
/// `false` rather than erroring, so a corrupted row behaves like a wrong
/// password.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iters), Some(salt), Some(digest), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    let Ok(iterations) = iters.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (URL_SAFE_NO_PAD.decode(salt), URL_SAFE_NO_PAD.decode(digest))
    else {
        return false;
    };

    let actual = derive(password.as_bytes(), &salt, iterations);
    constant_time_eq(&actual, &expected)
}

/// Iterated SHA-256 over `salt || password`.
fn derive(password: &[u8], salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password);
    let mut digest = hasher.finalize();

    for _ in 1..iterations {
        digest = Sha256::digest(digest);
    }
    digest.into()
}

/// Length-then-XOR comparison that does not short-circuit on the first
/// differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
