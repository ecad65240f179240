//! Signed bearer tokens (HS256 JWT) binding a user id and email.

use crate::models::User;
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifetime of tokens minted by `issue_refresh`.
pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(30 * 86_400);

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
    #[error("Token encoding failed: {0}")]
    Encoding(String),
    #[error("Token lifetime out of range")]
    LifetimeOutOfRange,
}

/// Converts a configured lifetime, rejecting values whose expiry would not
/// fit in a timestamp.
pub fn checked_lifetime(ttl: Duration) -> Result<chrono::Duration, TokenError> {
    let ttl = chrono::Duration::from_std(ttl).map_err(|_| TokenError::LifetimeOutOfRange)?;
    Utc::now()
        .checked_add_signed(ttl)
        .ok_or(TokenError::LifetimeOutOfRange)?;
    Ok(ttl)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, TokenError> {
        Ok(Self::with_chrono_ttl(secret, checked_lifetime(ttl)?))
    }

    /// Accepts a signed lifetime so tests can mint already-expired tokens.
    pub fn with_chrono_ttl(secret: &str, ttl: chrono::Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        self.issue_for(&user.id, &user.email, self.ttl)
    }

    pub fn issue_refresh(&self, user: &User) -> Result<String, TokenError> {
        let ttl = checked_lifetime(REFRESH_TOKEN_TTL)?;
        self.issue_for(&user.id, &user.email, ttl)
    }

    fn issue_for(
        &self,
        user_id: &str,
        email: &str,
        ttl: chrono::Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(TokenError::LifetimeOutOfRange)?;
        let claims = TokenClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}
