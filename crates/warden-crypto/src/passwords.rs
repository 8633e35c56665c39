use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub iterations: u32,
    pub memory_kb: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: 3,
            memory_kb: 65536,
            parallelism: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    InvalidParams(String),
    HashFailed(String),
    MalformedHash(String),
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParams(err) => write!(f, "invalid kdf params: {err}"),
            Self::HashFailed(err) => write!(f, "password hashing failed: {err}"),
            Self::MalformedHash(err) => write!(f, "malformed password hash: {err}"),
        }
    }
}

impl std::error::Error for PasswordError {}

fn argon2_with(params: &KdfParams) -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(params.memory_kb, params.iterations, params.parallelism, None)
        .map_err(|err| PasswordError::InvalidParams(err.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes `password` into a PHC string carrying its own salt and params.
#[instrument(level = "debug", skip(password))]
pub fn hash_password(password: &str, params: &KdfParams) -> Result<String, PasswordError> {
    let argon2 = argon2_with(params)?;
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordError::HashFailed(err.to_string()))
}

/// Returns `Ok(false)` on a wrong password; errors only on a malformed hash.
#[instrument(level = "debug", skip(stored, password))]
pub fn verify_password(stored: &str, password: &str) -> Result<bool, PasswordError> {
    let parsed =
        PasswordHash::new(stored).map_err(|err| PasswordError::MalformedHash(err.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordError::MalformedHash(err.to_string())),
    }
}
