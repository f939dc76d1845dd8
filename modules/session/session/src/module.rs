//! Session module wiring.

use std::sync::Arc;

use session_sdk::{IdentityProvider, SessionClient, SettingsStore};
use tracing::info;

use crate::config::{ConfigError, SessionConfig};
use crate::domain::{Service, SessionLocalClient};

/// Session module.
///
/// Builds the session service and hands out the client that UI consumers
/// share. The module does not start initialization on its own; callers
/// run [`SessionClient::initialize`] once at startup.
pub struct SessionModule {
    client: Arc<dyn SessionClient>,
}

impl SessionModule {
    /// Validate the configuration and build the module.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration does not validate.
    #[tracing::instrument(skip_all, fields(network = ?config.network))]
    pub fn new(
        config: &SessionConfig,
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn SettingsStore>,
    ) -> Result<Self, ConfigError> {
        let svc = Arc::new(Service::new(config, provider, store)?);
        info!(
            identity_provider = %config.identity_provider_url()?,
            "Session module configured"
        );

        let client: Arc<dyn SessionClient> = Arc::new(SessionLocalClient::new(svc));
        Ok(Self { client })
    }

    /// Shared session client.
    #[must_use]
    pub fn client(&self) -> Arc<dyn SessionClient> {
        Arc::clone(&self.client)
    }
}
