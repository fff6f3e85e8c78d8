use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AuthError;

pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(sub: String, email: String, iat: i64, ttl: Duration) -> Self {
        Self {
            sub,
            email,
            iat,
            exp: iat + ttl.as_secs() as i64,
        }
    }
}

/// HS256 signing and verification keys derived from one shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiration: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, expiration: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiration,
        }
    }

    pub fn expiration(&self) -> Duration { self.expiration }

    pub fn issue(&self, sub: &str, email: &str) -> Result<String, AuthError> {
        let claims = Claims::new(
            sub.to_string(),
            email.to_string(),
            Utc::now().timestamp(),
            self.expiration,
        );
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Checks signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                AuthError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys { JwtKeys::new("test-secret", DEFAULT_EXPIRATION) }

    #[test]
    fn test_issue_and_verify() {
        let keys = keys();

        let token = keys.issue("user-1", "a@example.com").unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_other_secret_is_rejected() {
        let token = keys().issue("user-1", "a@example.com").unwrap();
        let other = JwtKeys::new("other-secret", DEFAULT_EXPIRATION);

        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = keys();
        let issued = Utc::now().timestamp() - 7200;
        let claims = Claims::new(
            "user-1".into(),
            "a@example.com".into(),
            issued,
            DEFAULT_EXPIRATION,
        );

        let token = keys.sign(&claims).unwrap();

        assert!(matches!(keys.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            keys().verify("not.a.token"),
            Err(AuthError::InvalidToken)
        ));
    }
}
