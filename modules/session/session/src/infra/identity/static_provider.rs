//! Static identity provider.
//!
//! Authenticates every login as one configured principal without any
//! external ceremony. Useful for local development, demos and tests.
//!
//! ## Configuration
//!
//! ```yaml
//! identity:
//!   principal: "2vxsx-fae"
//!   session_file: "/tmp/daoverse/session"
//!   # reject_login_with: "user cancelled"
//!   # fail_logout_with: "network down"
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use session_sdk::{
    ClientOptions, IdentityClient, IdentityError, IdentityProvider, LoginCeremony, LoginOptions,
    Principal,
};

/// Provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticIdentityConfig {
    /// Principal every successful login resolves to.
    pub principal: String,

    /// Reason reported through the error callback instead of logging in.
    pub reject_login_with: Option<String>,

    /// Reason reported when ending the session.
    pub fail_logout_with: Option<String>,

    /// File that keeps the session across restarts. In-memory when unset.
    pub session_file: Option<PathBuf>,
}

impl Default for StaticIdentityConfig {
    fn default() -> Self {
        Self {
            principal: "2vxsx-fae".to_owned(),
            reject_login_with: None,
            fail_logout_with: None,
            session_file: None,
        }
    }
}

pub struct StaticIdentityProvider {
    config: StaticIdentityConfig,
}

impl StaticIdentityProvider {
    #[must_use]
    pub fn new(config: StaticIdentityConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn create(
        &self,
        options: &ClientOptions,
    ) -> Result<Arc<dyn IdentityClient>, IdentityError> {
        let principal = Principal::parse(self.config.principal.clone())
            .map_err(|e| IdentityError::InvalidPrincipal(e.to_string()))?;

        let restored = match &self.config.session_file {
            Some(path) => read_session(path).await?.as_ref() == Some(&principal),
            None => false,
        };

        tracing::debug!(
            %principal,
            restored,
            disable_idle_timeout = options.disable_idle_timeout,
            "static identity client created"
        );

        Ok(Arc::new(StaticIdentityClient {
            principal,
            config: self.config.clone(),
            authenticated: Arc::new(AtomicBool::new(restored)),
        }))
    }
}

struct StaticIdentityClient {
    principal: Principal,
    config: StaticIdentityConfig,
    authenticated: Arc<AtomicBool>,
}

#[async_trait]
impl IdentityClient for StaticIdentityClient {
    async fn is_authenticated(&self) -> Result<bool, IdentityError> {
        Ok(self.authenticated.load(Ordering::Acquire))
    }

    async fn principal(&self) -> Result<Principal, IdentityError> {
        if !self.authenticated.load(Ordering::Acquire) {
            return Err(IdentityError::Unavailable("not authenticated".into()));
        }
        Ok(self.principal.clone())
    }

    async fn login(&self, options: &LoginOptions) -> Result<(), IdentityError> {
        tracing::debug!(
            identity_provider = %options.identity_provider,
            max_time_to_live_ns = options.max_time_to_live_nanos(),
            "static login ceremony"
        );

        let (callbacks, ceremony) = LoginCeremony::new();
        let reject = self.config.reject_login_with.clone();
        let session_file = self.config.session_file.clone();
        let principal = self.principal.clone();
        let authenticated = Arc::clone(&self.authenticated);

        // Settles out of band, the way a popup window would.
        tokio::spawn(async move {
            if let Some(reason) = reject {
                callbacks.on_error(reason);
                return;
            }
            if let Some(path) = session_file
                && let Err(e) = write_session(&path, &principal).await
            {
                callbacks.on_error(format!("failed to persist session: {e}"));
                return;
            }
            authenticated.store(true, Ordering::Release);
            callbacks.on_success();
        });

        ceremony.wait().await
    }

    async fn logout(&self) -> Result<(), IdentityError> {
        if let Some(reason) = &self.config.fail_logout_with {
            return Err(IdentityError::Unavailable(reason.clone()));
        }
        if let Some(path) = &self.config.session_file {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(IdentityError::Unavailable(e.to_string())),
            }
        }
        self.authenticated.store(false, Ordering::Release);
        Ok(())
    }
}

async fn read_session(path: &Path) -> Result<Option<Principal>, IdentityError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Principal::parse(text.trim()).ok()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(IdentityError::Unavailable(e.to_string())),
    }
}

async fn write_session(path: &Path, principal: &Principal) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, principal.as_str()).await
}
