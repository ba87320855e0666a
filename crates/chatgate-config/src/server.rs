use crate::{ConfigError, parse_var};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub app_env: AppEnv,
}

impl ServerConfig {
    /// # Environment Variables
    ///
    /// - `PORT`: default 3000
    /// - `APP_ENV`: `production`/`prod`, anything else is development
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: parse_var(&lookup, "PORT", 3000)?,
            app_env: AppEnv::parse(lookup("APP_ENV")),
        })
    }
}
