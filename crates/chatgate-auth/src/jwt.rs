//! HS256 token verification (and the matching signer).
//!
//! Verification checks the signature against the configured secret, rejects
//! any algorithm other than HS256 and, when the token carries `exp`, rejects
//! it once expired (allowing `leeway_seconds` of clock skew). Tokens without
//! `exp` are accepted, matching the issuers already in use.
//!
//! # Example
//!
//! ```ignore
//! use chatgate_auth::{Claims, create_token, verify_token};
//! use chatgate_config::JwtConfig;
//!
//! let config = JwtConfig::from_env()?;
//! let token = create_token(&Claims::new(user_id, "admin"), &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, "admin");
//! ```

use std::collections::HashSet;

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use thiserror::Error;

use chatgate_config::JwtConfig;

use crate::claims::Claims;

/// Why a credential was rejected.
///
/// The distinction is for logs only; every variant means "invalid credential"
/// to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token is not valid yet")]
    NotYetValid,
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            JwtErrorKind::ExpiredSignature => TokenError::Expired,
            JwtErrorKind::ImmatureSignature => TokenError::NotYetValid,
            JwtErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

fn validation(jwt_config: &JwtConfig) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = jwt_config.leeway_seconds;
    validation.required_spec_claims = HashSet::new();
    validation.validate_aud = false;
    validation
}

/// Verifies a credential and returns the embedded claims.
///
/// # Errors
///
/// - [`TokenError::InvalidSignature`] if signed with another secret
/// - [`TokenError::Expired`] if `exp` is in the past
/// - [`TokenError::Malformed`] for anything that is not a well-formed HS256
///   token carrying at least `sub` and `role`
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, TokenError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation(jwt_config),
    )
    .map(|data| data.claims)
    .map_err(TokenError::from)
}

/// Signs `claims`, stamping `iat` and `exp` when the caller left them unset.
///
/// `exp` defaults to now + `expires_in`.
pub fn create_token(claims: &Claims, jwt_config: &JwtConfig) -> Result<String, TokenError> {
    let now = Utc::now().timestamp().max(0) as u64;
    let mut claims = claims.clone();
    claims.iat.get_or_insert(now);
    claims
        .exp
        .get_or_insert(now.saturating_add(jwt_config.expires_in.max(0) as u64));

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}
