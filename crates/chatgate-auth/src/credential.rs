//! Pulls the credential out of an `authorization` header value.
//!
//! Two conventions are accepted:
//!
//! - `Bearer <credential>`: the prefix is stripped (case-sensitive)
//! - `<credential>`: the whole value is the credential
//!
//! Existing clients of the chat service send bare tokens, so the bare form
//! stays accepted next to the standard bearer scheme. Neither is preferred.

use thiserror::Error;

pub const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("authorization header is missing or empty")]
    Missing,
}

pub fn extract_credential(header_value: Option<&str>) -> Result<&str, CredentialError> {
    let value = header_value.unwrap_or_default();
    let credential = value.strip_prefix(BEARER_PREFIX).unwrap_or(value).trim();

    if credential.is_empty() {
        return Err(CredentialError::Missing);
    }

    Ok(credential)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_and_bare_extract_the_same_credential() {
        assert_eq!(extract_credential(Some("Bearer abc123")), Ok("abc123"));
        assert_eq!(extract_credential(Some("abc123")), Ok("abc123"));
    }

    #[test]
    fn test_absent_or_empty_is_missing() {
        assert_eq!(extract_credential(None), Err(CredentialError::Missing));
        assert_eq!(extract_credential(Some("")), Err(CredentialError::Missing));
        assert_eq!(extract_credential(Some("   ")), Err(CredentialError::Missing));
    }

    #[test]
    fn test_prefix_alone_is_missing() {
        assert_eq!(extract_credential(Some("Bearer ")), Err(CredentialError::Missing));
        assert_eq!(extract_credential(Some("Bearer    ")), Err(CredentialError::Missing));
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        assert_eq!(extract_credential(Some("bearer abc123")), Ok("bearer abc123"));
    }
}
