use thiserror::Error;

/// Startup configuration failures.
///
/// These are reported by the process bootstrap before any request is served.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}
