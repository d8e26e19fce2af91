//! JWT Token Generation and Validation
//!
//! Tokens are signed with HS256 using the shared `JWT_SECRET`. Refresh tokens
//! carry a `jti` so they can be blacklisted on logout and rotation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{AuthError, AuthResult};

/// JWT claims for access and refresh tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as UUID string).
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Token type (access or refresh).
    pub typ: TokenType,
    /// JWT ID for refresh token revocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Subject as a user ID.
    pub fn user_id(&self) -> AuthResult<Uuid> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }

    /// Refresh token ID.
    pub fn token_id(&self) -> AuthResult<Uuid> {
        self.jti
            .as_deref()
            .and_then(|jti| jti.parse().ok())
            .ok_or(AuthError::InvalidToken)
    }

    /// Expiry as a timestamp.
    pub fn expires_at(&self) -> AuthResult<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0).ok_or(AuthError::InvalidToken)
    }
}

/// Token type discriminator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived access token.
    Access,
    /// Long-lived refresh token.
    Refresh,
}

/// Token pair returned after successful authentication.
#[derive(Debug)]
pub struct TokenPair {
    /// Access token (short-lived).
    pub access_token: String,
    /// Refresh token (long-lived).
    pub refresh_token: String,
    /// Access token expiry in seconds.
    pub access_expires_in: i64,
    /// Refresh token ID.
    pub refresh_token_id: Uuid,
}

/// Generate both access and refresh tokens.
///
/// # Arguments
/// * `user_id` - The user's UUID
/// * `secret` - HS256 signing secret
/// * `access_expiry_seconds` - Access token validity (typically 900 = 15 min)
/// * `refresh_expiry_seconds` - Refresh token validity (typically 604800 = 7 days)
pub fn generate_token_pair(
    user_id: Uuid,
    secret: &str,
    access_expiry_seconds: i64,
    refresh_expiry_seconds: i64,
) -> AuthResult<TokenPair> {
    let now = Utc::now();
    let refresh_token_id = Uuid::now_v7();
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::new(Algorithm::HS256);

    let access_claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::seconds(access_expiry_seconds)).timestamp(),
        iat: now.timestamp(),
        typ: TokenType::Access,
        jti: None,
    };
    let access_token = encode(&header, &access_claims, &encoding_key)?;

    let refresh_claims = Claims {
        sub: user_id.to_string(),
        exp: (now + Duration::seconds(refresh_expiry_seconds)).timestamp(),
        iat: now.timestamp(),
        typ: TokenType::Refresh,
        jti: Some(refresh_token_id.to_string()),
    };
    let refresh_token = encode(&header, &refresh_claims, &encoding_key)?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        access_expires_in: access_expiry_seconds,
        refresh_token_id,
    })
}

fn decode_claims(token: &str, secret: &str, expected: TokenType) -> AuthResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind()
    {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    if token_data.claims.typ != expected {
        return Err(AuthError::InvalidToken);
    }

    Ok(token_data.claims)
}

/// Validate and decode an access token.
///
/// Returns an error if the token is invalid, expired, or is a refresh token.
pub fn validate_access_token(token: &str, secret: &str) -> AuthResult<Claims> {
    decode_claims(token, secret, TokenType::Access)
}

/// Validate and decode a refresh token.
///
/// Returns an error if the token is invalid, expired, or is an access token.
pub fn validate_refresh_token(token: &str, secret: &str) -> AuthResult<Claims> {
    let claims = decode_claims(token, secret, TokenType::Refresh)?;

    // Refresh tokens MUST have a jti
    if claims.jti.is_none() {
        return Err(AuthError::InvalidToken);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret";

    #[test]
    fn test_generate_token_pair() {
        let user_id = Uuid::now_v7();

        let tokens = generate_token_pair(user_id, TEST_SECRET, 900, 604_800).unwrap();

        assert!(!tokens.access_token.is_empty());
        assert!(!tokens.refresh_token.is_empty());
        assert_eq!(tokens.access_expires_in, 900);
    }

    #[test]
    fn test_validate_access_token() {
        let user_id = Uuid::now_v7();

        let tokens = generate_token_pair(user_id, TEST_SECRET, 900, 604_800).unwrap();
        let claims = validate_access_token(&tokens.access_token, TEST_SECRET).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.typ, TokenType::Access);
        assert!(claims.jti.is_none());
    }

    #[test]
    fn test_validate_refresh_token() {
        let user_id = Uuid::now_v7();

        let tokens = generate_token_pair(user_id, TEST_SECRET, 900, 604_800).unwrap();
        let claims = validate_refresh_token(&tokens.refresh_token, TEST_SECRET).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.typ, TokenType::Refresh);
        assert_eq!(claims.token_id().unwrap(), tokens.refresh_token_id);
        assert!(claims.expires_at().unwrap() > Utc::now());
    }

    #[test]
    fn test_access_token_rejects_refresh_token() {
        let tokens = generate_token_pair(Uuid::now_v7(), TEST_SECRET, 900, 604_800).unwrap();
        let result = validate_access_token(&tokens.refresh_token, TEST_SECRET);

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_refresh_token_rejects_access_token() {
        let tokens = generate_token_pair(Uuid::now_v7(), TEST_SECRET, 900, 604_800).unwrap();
        let result = validate_refresh_token(&tokens.access_token, TEST_SECRET);

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_invalid_secret_fails() {
        let tokens = generate_token_pair(Uuid::now_v7(), TEST_SECRET, 900, 604_800).unwrap();
        let result = validate_access_token(&tokens.access_token, "another-secret");

        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token() {
        let tokens = generate_token_pair(Uuid::now_v7(), TEST_SECRET, -60, -60).unwrap();

        assert!(matches!(
            validate_access_token(&tokens.access_token, TEST_SECRET),
            Err(AuthError::TokenExpired)
        ));
        assert!(matches!(
            validate_refresh_token(&tokens.refresh_token, TEST_SECRET),
            Err(AuthError::TokenExpired)
        ));
    }
}
