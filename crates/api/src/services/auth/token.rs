//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with the configured secret, carrying the
//! user id as `sub` and expiring after 30 days. Requests present them as
//! `Authorization: Bearer <token>`.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use velour_core::UserId;

use super::AuthError;

/// Token lifetime in seconds (30 days).
const TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// JWT claims carried by a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a decimal string.
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at time (Unix timestamp).
    pub iat: i64,
}

impl Claims {
    /// The user id this token was issued for.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if `sub` isn't a valid id.
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub
            .parse::<i32>()
            .map(UserId::new)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// Sign a token for a user.
///
/// # Errors
///
/// Returns `AuthError::TokenCreation` if signing fails.
pub fn issue(user_id: UserId, secret: &SecretString) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + TOKEN_TTL_SECS,
        iat: now,
    };

    let key = EncodingKey::from_secret(secret.expose_secret().as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|_| AuthError::TokenCreation)
}

/// Verify a token's signature and expiry, returning its claims.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` for a bad signature, malformed token,
/// or expired token.
pub fn verify(token: &str, secret: &SecretString) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
    let data = decode::<Claims>(token, &key, &Validation::default())
        .map_err(|_| AuthError::InvalidToken)?;

    Ok(data.claims)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("k8Qm2vXr7pLw4sNc9jHt5bYd3fGz6aEu")
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let token = issue(UserId::new(42), &secret()).unwrap();
        let claims = verify(&token, &secret()).unwrap();

        assert_eq!(claims.user_id().unwrap(), UserId::new(42));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = issue(UserId::new(1), &secret()).unwrap();
        let other = SecretString::from("zZ1xC2vB3nM4aS5dF6gH7jK8lQ9wE0rT");

        assert!(matches!(
            verify(&token, &other),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(matches!(
            verify("not-a-token", &secret()),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_claims_reject_non_numeric_sub() {
        let claims = Claims {
            sub: "abc".to_owned(),
            exp: 0,
            iat: 0,
        };
        assert!(matches!(claims.user_id(), Err(AuthError::InvalidToken)));
    }
}
