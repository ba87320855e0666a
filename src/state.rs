use chatgate_config::{ConfigError, JwtConfig};

#[derive(Clone, Debug)]
pub struct AppState {
    pub jwt_config: JwtConfig,
}

impl AppState {
    pub fn new(jwt_config: JwtConfig) -> Self {
        Self { jwt_config }
    }
}

pub fn init_app_state() -> Result<AppState, ConfigError> {
    Ok(AppState {
        jwt_config: JwtConfig::from_env()?,
    })
}
