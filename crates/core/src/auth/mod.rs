mod basic;
mod none;
mod traits;
mod types;

pub use basic::*;
pub use none::*;
pub use traits::*;
pub use types::*;

use crate::config::{AuthConfig, AuthMethod};

/// Factory function to create authenticator from config
pub fn create_authenticator(config: &AuthConfig) -> Result<Box<dyn Authenticator>, AuthError> {
    match config.method {
        AuthMethod::None => Ok(Box::new(NoneAuthenticator::new())),
        AuthMethod::Basic => {
            let username = config.username.clone().ok_or_else(|| {
                AuthError::ConfigurationError(
                    "username must be set when using Basic auth method".to_string(),
                )
            })?;
            let password = config.password.clone().ok_or_else(|| {
                AuthError::ConfigurationError(
                    "password must be set when using Basic auth method".to_string(),
                )
            })?;
            Ok(Box::new(BasicAuthenticator::new(username, password)))
        }
    }
}
