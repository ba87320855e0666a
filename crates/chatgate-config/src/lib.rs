//! # Chatgate Config
//!
//! Configuration types for the chatgate request pipeline.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`jwt`]: credential verification settings (signing secret, leeway)
//! - [`server`]: listening port and deployment environment
//!
//! Every value is read once at process start and then shared read-only.
//! Nothing in request-handling code reads the environment.
//!
//! # Example
//!
//! ```ignore
//! use chatgate_config::{JwtConfig, ServerConfig};
//!
//! dotenvy::dotenv().ok();
//! let jwt_config = JwtConfig::from_env()?;
//! let server_config = ServerConfig::from_env()?;
//! ```

pub mod error;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use error::ConfigError;
pub use jwt::{JwtConfig, Secret};
pub use server::{AppEnv, ServerConfig};

/// Reads an optional numeric variable, falling back to `default` when unset.
///
/// A value that is set but does not parse is a configuration error rather
/// than a silent fallback.
pub(crate) fn parse_var<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
