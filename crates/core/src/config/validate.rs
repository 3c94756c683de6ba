use super::{types::Config, AuthMethod, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Auth section exists (enforced by serde)
/// - Basic auth has a non-empty username and password, and the username has no `:`
/// - Server port is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.auth.method == AuthMethod::Basic {
        let username = config.auth.username.as_deref().unwrap_or_default();
        let password = config.auth.password.as_deref().unwrap_or_default();

        if username.is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.username must be set when using basic auth".to_string(),
            ));
        }
        if username.contains(':') {
            return Err(ConfigError::ValidationError(
                "auth.username cannot contain ':'".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.password must be set when using basic auth".to_string(),
            ));
        }
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    Ok(())
}
