// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
/** Signed identity tokens
Tokens are HS256 JSON Web Tokens carrying the role, the user id for user
identities, and an absolute expiry. Nothing is stored server side, so a
token stays valid until it expires. */
use std::time::Duration;

use chrono::{DateTime, TimeDelta};
use jobboard_common::Role;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::Identity;
use crate::error::AppError;
use crate::SharedClock;

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Issued at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

impl Claims {
    /// Map the payload back onto an identity, rejecting shapes we never issue
    fn into_identity(self) -> Result<Identity, AppError> {
        match (self.role, self.id) {
            (Role::Admin, None) => Ok(Identity::Admin),
            (Role::User, Some(id)) if !id.is_empty() => Ok(Identity::User { id }),
            _ => Err(AppError::InvalidToken),
        }
    }
}

/// Signs and verifies identity tokens with a process-wide secret
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: SharedClock,
}

impl TokenCodec {
    pub fn new(secret: &[u8], clock: SharedClock) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is checked against our own clock in `verify`
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }

    /// Sign `identity` with an expiry of now + `ttl`. `exp` has whole-second
    /// granularity and is rounded up, so a token never expires early.
    pub fn issue(&self, identity: &Identity, ttl: Duration) -> Result<String, AppError> {
        let now = self.clock.utc();
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|_| AppError::Internal("token ttl out of range".to_string()))?;
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::Internal("token expiry out of range".to_string()))?;

        let claims = Claims {
            role: identity.role(),
            id: identity.user_id().map(str::to_string),
            iat: now.timestamp(),
            exp: exp.timestamp() + i64::from(exp.timestamp_subsec_nanos() > 0),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))
    }

    /// Check signature, structure and expiry. Every failure is `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Identity, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        let expires_at =
            DateTime::from_timestamp(data.claims.exp, 0).ok_or(AppError::InvalidToken)?;
        if self.clock.utc() > expires_at {
            return Err(AppError::InvalidToken);
        }
        data.claims.into_identity()
    }
}
