//! Password hashing and session token signing.
//!
//! Hashes are Argon2id PHC strings with a fresh random salt per call, so two
//! hashes of the same password never compare equal; always go through
//! [`verify_password`]. Tokens are HS256 JWTs carrying `{_id, access, jti, iat}`.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task;

use crate::config::SecurityConfig;
use crate::domain::{AUTH_ACCESS, ObjectId};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Invalid token")]
    InvalidToken,
}

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String, CredentialError> {
    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| CredentialError::Hash(format!("Invalid Argon2 params: {e}")))?;

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hash(e.to_string()))
}

/// Returns false on mismatch and on a hash that does not parse.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    // Parameters are read from the PHC string, not from the default instance.
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// [`hash_password`] on the blocking pool; Argon2 would otherwise stall a
/// runtime worker.
pub async fn hash_password_blocking(
    password: String,
    config: SecurityConfig,
) -> Result<String, CredentialError> {
    task::spawn_blocking(move || hash_password(&password, &config))
        .await
        .map_err(|e| CredentialError::Hash(format!("Password hashing task panicked: {e}")))?
}

pub async fn verify_password_blocking(password: String, hash: String) -> bool {
    task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .unwrap_or(false)
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(rename = "_id")]
    id: String,
    access: String,
    jti: String,
    iat: i64,
}

/// Mints and checks session tokens with one process-wide secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        // Sessions end on logout, not on a clock.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, user_id: &ObjectId) -> Result<String, CredentialError> {
        let claims = Claims {
            id: user_id.to_string(),
            access: AUTH_ACCESS.to_string(),
            jti: uuid::Uuid::new_v4().simple().to_string(),
            iat: chrono::Utc::now().timestamp(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| CredentialError::Signing(e.to_string()))
    }

    /// Fails on a bad signature, a malformed payload, a non-auth token or a
    /// subject that is not an object id.
    pub fn verify(&self, token: &str) -> Result<ObjectId, CredentialError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| CredentialError::InvalidToken)?;

        if data.claims.access != AUTH_ACCESS {
            return Err(CredentialError::InvalidToken);
        }

        ObjectId::parse(&data.claims.id).map_err(|_| CredentialError::InvalidToken)
    }
}
