//! Password hashing with Argon2id.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$...`), so the parameters
//! and salt travel with the hash.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

pub(crate) fn hash_secret(secret: &str) -> ResultEngine<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|err| EngineError::Internal(format!("salt encoding: {err}")))?;
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| EngineError::Internal(format!("password hashing: {err}")))
}

/// A stored value that is not a valid PHC string never verifies.
pub(crate) fn verify_secret(secret: &str, stored: &str) -> bool {
    let Ok(hash) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(secret.as_bytes(), &hash)
        .is_ok()
}
