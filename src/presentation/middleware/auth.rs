//! Bearer Token Verification
//!
//! HS256 JWTs whose `sub` claim is the caller's user id.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Verify a bearer token and return the user id it was issued for
pub fn verify_token(token: &str, secret: &str) -> Result<String, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized("Token expired".into()),
        _ => AppError::Unauthorized("Invalid token".into()),
    })?;

    let user_id = token_data.claims.sub.trim();
    if user_id.is_empty() {
        return Err(AppError::Unauthorized("Invalid token claims".into()));
    }

    Ok(user_id.to_string())
}

/// Issue a token for `user_id`, valid for `ttl_seconds`
pub fn issue_token(user_id: &str, secret: &str, ttl_seconds: i64) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + ttl_seconds,
        iat: now,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}
