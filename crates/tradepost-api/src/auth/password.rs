// Password hashing and verification
// Argon2id with a fresh random salt per hash; the work factor lives in the
// PHC string, so it can be raised without a schema change.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use rand::RngCore;
use thiserror::Error;

const SALT_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("failed to hash password")]
    Hash(#[source] password_hash::Error),
}

/// Derive a salted one-way hash of the password, returned as a PHC string.
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let mut salt_bytes = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes).map_err(HashError::Hash)?;

    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(HashError::Hash)?
        .to_string();

    Ok(phc)
}

/// Compare a plaintext password against a stored PHC hash.
/// Returns false on mismatch or on an unparseable hash; never errors.
/// The comparison inside the argon2 crate does not short-circuit on the
/// first differing byte.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
