use std::sync::Arc;

use libris_core::{Authenticator, Config, Library, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    library: Arc<dyn Library>,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        library: Arc<dyn Library>,
    ) -> Self {
        Self {
            config,
            authenticator,
            library,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn library(&self) -> &dyn Library {
        self.library.as_ref()
    }
}
