//! Credential hasher.
//!
//! A digest is the standard base64 encoding of `salt || key`: a 16-byte
//! random salt followed by a 32-byte PBKDF2-HMAC-SHA256 derived key, 64
//! characters in total. Verification re-derives the key from the embedded
//! salt and compares in constant time.
//!
//! Derivation costs milliseconds of CPU. Async callers should run it on the
//! blocking pool.

use std::num::NonZeroU32;

use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;
use rand::rngs::OsRng;
use ring::pbkdf2;

use crate::error::AuthError;

/// Minimum (and default) PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 10_000;

pub const SALT_LEN: usize = 16;
pub const KEY_LEN: usize = 32;
pub const DIGEST_LEN: usize = SALT_LEN + KEY_LEN;

static ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

const DEFAULT_ITERATIONS: NonZeroU32 = match NonZeroU32::new(PBKDF2_ITERATIONS) {
    Some(n) => n,
    None => panic!("PBKDF2_ITERATIONS must be non-zero"),
};

/// Salted PBKDF2 hasher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    iterations: NonZeroU32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with a higher work factor.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` below [`PBKDF2_ITERATIONS`].
    pub fn with_iterations(iterations: u32) -> Result<Self, AuthError> {
        match NonZeroU32::new(iterations) {
            Some(n) if iterations >= PBKDF2_ITERATIONS => Ok(Self { iterations: n }),
            _ => Err(AuthError::configuration(format!(
                "PBKDF2 iteration count must be at least {PBKDF2_ITERATIONS}, got {iterations}"
            ))),
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations.get()
    }

    /// Produces a digest with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Hashing` if the OS random source fails.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let mut salt = [0u8; SALT_LEN];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| AuthError::hashing(format!("salt generation failed: {e}")))?;
        Ok(self.hash_with_salt(password, &salt))
    }

    /// Checks `password` against `digest`. Malformed digests never match.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        let bytes = match STANDARD.decode(digest.trim()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %e, "credential digest is not valid base64");
                return false;
            }
        };

        if bytes.len() != DIGEST_LEN {
            tracing::debug!(
                length = bytes.len(),
                expected = DIGEST_LEN,
                "credential digest has wrong length"
            );
            return false;
        }

        let (salt, key) = bytes.split_at(SALT_LEN);
        pbkdf2::verify(ALGORITHM, self.iterations, salt, password.as_bytes(), key).is_ok()
    }

    fn hash_with_salt(&self, password: &str, salt: &[u8; SALT_LEN]) -> String {
        let mut digest = [0u8; DIGEST_LEN];
        let (salt_part, key_part) = digest.split_at_mut(SALT_LEN);
        salt_part.copy_from_slice(salt);
        pbkdf2::derive(ALGORITHM, self.iterations, salt, password.as_bytes(), key_part);
        STANDARD.encode(digest)
    }
}

/// [`PasswordHasher::hash`] with the default work factor.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    PasswordHasher::default().hash(password)
}

/// [`PasswordHasher::verify`] with the default work factor.
pub fn verify_password(password: &str, digest: &str) -> bool {
    PasswordHasher::default().verify(password, digest)
}
