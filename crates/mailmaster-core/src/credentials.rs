//! Password hashing and bearer token generation

use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use mailmaster_common::{Error, Result};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Hash a password with argon2 default parameters
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against an argon2 hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| Error::Internal(format!("Invalid password hash format: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::Internal(format!(
            "Password verification error: {}",
            e
        ))),
    }
}

/// Hash a password on the blocking pool
pub async fn hash_password_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| Error::Internal(format!("Hashing task failed: {}", e)))?
}

/// Verify a password on the blocking pool
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| Error::Internal(format!("Verification task failed: {}", e)))?
}

/// Generate a fresh plaintext bearer token (64 hex chars)
pub fn generate_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// SHA-256 hex digest of a plaintext token, as stored
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("secret123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret123", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("secret123", "not-a-hash").is_err());
    }

    #[test]
    fn test_tokens_are_unique_and_hashed() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);

        let digest = hash_token(&a);
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, hash_token(&a));
        assert_ne!(digest, a);
    }

    #[tokio::test]
    async fn test_blocking_helpers() {
        let hash = hash_password_blocking("password".to_string()).await.unwrap();
        assert!(verify_password_blocking("password".to_string(), hash)
            .await
            .unwrap());
    }
}
