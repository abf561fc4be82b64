//! Bearer token minting and verification.
//!
//! Tokens are JWTs carrying the user id and role, valid for a fixed window.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cartwheel_core::{Role, UserId};

/// Fixed token lifetime.
const TOKEN_TTL_DAYS: i64 = 7;

/// Claims carried by every bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The user's id.
    pub sub: i32,
    /// The user's role at mint time.
    pub role: Role,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

impl Claims {
    /// The user id these claims resolve to.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::new(self.sub)
    }
}

/// Errors from token verification.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// The token's expiry window has passed.
    #[error("token expired")]
    Expired,
    /// The token is malformed or its signature does not verify.
    #[error("invalid token")]
    Invalid,
}

/// Signing and verification keys derived from the configured secret.
///
/// Built once at startup and shared through the application state.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    /// Derive keys from the configured secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Mint a token for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if serialization fails (practically
    /// unreachable with these claim types).
    pub fn mint(&self, user_id: UserId, role: Role) -> Result<String, TokenError> {
        let exp = (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp();
        let claims = Claims {
            sub: user_id.as_i32(),
            role,
            exp,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Invalid)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for a stale token, `TokenError::Invalid`
    /// for anything malformed, unsigned, or signed with another key.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn keys(secret: &str) -> TokenKeys {
        TokenKeys::new(&SecretString::from(secret.to_owned()))
    }

    #[test]
    fn test_mint_verify_roundtrip() {
        let keys = keys("k9#vPq2$mN8xWz5@jR3&hL7*bT4^cF6!");
        let token = keys.mint(UserId::new(42), Role::Admin).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.user_id(), UserId::new(42));
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_verify_rejects_expired() {
        let keys = keys("k9#vPq2$mN8xWz5@jR3&hL7*bT4^cF6!");
        // Well past the default 60s validation leeway
        let claims = Claims {
            sub: 1,
            role: Role::User,
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();

        assert_eq!(keys.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let minter = keys("k9#vPq2$mN8xWz5@jR3&hL7*bT4^cF6!");
        let verifier = keys("z1!aQ8@wE5#rT2$yU9%iO6^pA3&sD0*f");

        let token = minter.mint(UserId::new(1), Role::User).unwrap();
        assert_eq!(verifier.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let keys = keys("k9#vPq2$mN8xWz5@jR3&hL7*bT4^cF6!");
        assert_eq!(keys.verify("not-a-token"), Err(TokenError::Invalid));
        assert_eq!(keys.verify(""), Err(TokenError::Invalid));
    }
}
