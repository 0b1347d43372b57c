//! Bearer token verification
//!
//! Tokens are issued by the external identity provider; this backend only
//! verifies them against the shared signing secret.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token decoding failed: {0}")]
    DecodingFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Claims carried by identity-provider access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Email, when the provider includes it
    #[serde(default)]
    pub email: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Verify and decode a bearer token
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        if e.to_string().contains("ExpiredSignature") {
            JwtError::TokenExpired
        } else {
            JwtError::DecodingFailed(e.to_string())
        }
    })?;

    Ok(token_data.claims)
}

/// Extract user ID from claims
pub fn get_user_id_from_claims(claims: &Claims) -> Result<Uuid, JwtError> {
    Uuid::parse_str(&claims.sub).map_err(|e| JwtError::InvalidToken(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(sub: &str, secret: &str, ttl_seconds: i64) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            email: Some("test@example.com".to_string()),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_valid_token() {
        let user_id = Uuid::new_v4();
        let token = make_token(&user_id.to_string(), "test-secret", 900);

        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(get_user_id_from_claims(&claims).unwrap(), user_id);
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token("invalid.token.here", "test-secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let token = make_token(&Uuid::new_v4().to_string(), "secret1", 900);
        assert!(verify_token(&token, "secret2").is_err());
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let token = make_token("not-a-uuid", "test-secret", 900);
        let claims = verify_token(&token, "test-secret").unwrap();
        assert!(get_user_id_from_claims(&claims).is_err());
    }
}
