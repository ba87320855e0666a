//! # Chatgate Auth
//!
//! Authentication building blocks for the chatgate request pipeline.
//!
//! - [`credential`]: pulls the credential out of the `authorization` header
//! - [`claims`]: the identity payload carried by a credential
//! - [`jwt`]: credential verification (and signing for fixtures/issuers)
//!
//! # Example
//!
//! ```ignore
//! use chatgate_auth::{extract_credential, verify_token};
//!
//! let token = extract_credential(headers.get("authorization").and_then(|v| v.to_str().ok()))?;
//! let claims = verify_token(token, &jwt_config)?;
//! println!("{} acts as {}", claims.sub, claims.role);
//! ```

pub mod claims;
pub mod credential;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use credential::{CredentialError, extract_credential};
pub use jwt::{TokenError, create_token, verify_token};
