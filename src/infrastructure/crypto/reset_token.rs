//! Password-reset tokens
//!
//! HS256 JWTs carrying `{sub: user id, email}`. The HMAC key is the user's
//! current credential hash, so rotating the hash invalidates every token
//! issued before the rotation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime of a reset token in minutes.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 15;

/// Reset token claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ResetClaims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl ResetClaims {
    pub fn new(user_id: &str, email: &str, issued_at: DateTime<Utc>) -> Self {
        let exp = issued_at + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: issued_at.timestamp(),
        }
    }
}

/// Why a reset token was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expired => write!(f, "Reset token has expired"),
            Self::Invalid => write!(f, "Reset token is invalid"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Issue a reset token signed with `secret`, valid for 15 minutes from now.
pub fn issue_reset_token(
    user_id: &str,
    email: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue_reset_token_at(user_id, email, secret, Utc::now())
}

/// Issue a reset token as if it had been created at `issued_at`.
pub fn issue_reset_token_at(
    user_id: &str,
    email: &str,
    secret: &str,
    issued_at: DateTime<Utc>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = ResetClaims::new(user_id, email, issued_at);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify signature and expiry against `secret`.
pub fn verify_reset_token(token: &str, secret: &str) -> Result<ResetClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<ResetClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

/// Parse claims without checking the signature or expiry.
///
/// Only good for locating the user whose hash is the signing secret;
/// never use the result for authorization.
pub fn decode_reset_token_unverified(token: &str) -> Option<ResetClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    decode::<ResetClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims)
}
