// ============================
// jobboard-backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Params, Scrypt,
};

use crate::config::PasswordSettings;
use crate::error::AppError;

/// Derived key length in bytes
const OUTPUT_LEN: usize = 32;

/// One-way password hashing with a fresh salt per call
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing digest
    fn hash(&self, plain: &str) -> Result<String, AppError>;

    /// Check a plaintext password against a digest produced by [`hash`](Self::hash)
    fn verify(&self, plain: &str, digest: &str) -> bool;
}

/// scrypt in PHC string format
#[derive(Debug, Clone, Copy)]
pub struct ScryptHasher {
    params: Params,
}

impl ScryptHasher {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn from_settings(settings: &PasswordSettings) -> Result<Self, AppError> {
        let params = Params::new(settings.log_n, settings.r, settings.p, OUTPUT_LEN)
            .map_err(|e| AppError::InvalidInput(format!("scrypt params: {e}")))?;
        Ok(Self::new(params))
    }
}

impl Default for ScryptHasher {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

impl PasswordHasher for ScryptHasher {
    fn hash(&self, plain: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params, &salt)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?
            .to_string();
        Ok(hash)
    }

    fn verify(&self, plain: &str, digest: &str) -> bool {
        let parsed_hash = match PasswordHash::new(digest) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> ScryptHasher {
        ScryptHasher::from_settings(&PasswordSettings { log_n: 4, r: 8, p: 1 }).unwrap()
    }

    #[test]
    fn test_password_hashing_and_verification() {
        let hasher = cheap();
        let hash = hasher.hash("SecureP@ssw0rd").unwrap();

        assert_ne!(hash, "SecureP@ssw0rd");
        assert!(hash.starts_with("$scrypt$"));
        assert!(hasher.verify("SecureP@ssw0rd", &hash));
        assert!(!hasher.verify("wrong_password", &hash));
    }

    #[test]
    fn test_salt_differs_per_call() {
        let hasher = cheap();
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("same", &a));
        assert!(hasher.verify("same", &b));
    }

    #[test]
    fn test_garbage_digest_never_verifies() {
        assert!(!cheap().verify("anything", "not-a-phc-string"));
        assert!(!cheap().verify("", ""));
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(ScryptHasher::from_settings(&PasswordSettings { log_n: 4, r: 0, p: 1 }).is_err());
    }
}
