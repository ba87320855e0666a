use std::fmt;
use std::sync::Arc;

use crate::{ConfigError, parse_var};

/// HMAC signing secret shared by every request.
///
/// Cloning is cheap and the value never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Arc<str>);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Arc::from(value.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(**redacted**)")
    }
}

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: Secret,
    /// Clock skew tolerated when checking `exp`, in seconds.
    pub leeway_seconds: u64,
    /// Lifetime given to tokens signed by this process, in seconds.
    pub expires_in: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Secret::new(secret),
            leeway_seconds: 0,
            expires_in: 86400, // 1 day
        }
    }

    /// Loads the config from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `JWT_SECRET`: required, must not be blank
    /// - `JWT_LEEWAY_SECONDS`: default 0
    /// - `JWT_EXPIRES_IN`: default 86400
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            secret: Secret::new(secret),
            leeway_seconds: parse_var(&lookup, "JWT_LEEWAY_SECONDS", 0)?,
            expires_in: parse_var(&lookup, "JWT_EXPIRES_IN", 86400)?,
        })
    }
}
