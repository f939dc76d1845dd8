use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use session_sdk::{
    ClientOptions, IdentityClient, IdentityError, IdentityProvider, LoginOptions, Principal,
    SessionSnapshot, SessionView, SettingsStore, UserSettings,
};
use tokio::sync::watch;

use super::error::DomainError;
use super::repo::SettingsRepository;
use super::state::SessionState;
use crate::config::{ConfigError, SessionConfig};

/// Session manager.
///
/// Owns the session state and the per-principal settings record for the
/// lifetime of the application. The state lock is never held across an
/// `.await`; every change is published to subscribers after the lock is
/// released.
pub struct Service {
    provider: Arc<dyn IdentityProvider>,
    client_options: ClientOptions,
    login_options: LoginOptions,
    repo: SettingsRepository,
    client: RwLock<Option<Arc<dyn IdentityClient>>>,
    state: Mutex<SessionState>,
    login_in_flight: AtomicBool,
    /// Serializes settings updates so store and memory commit in the same order.
    update_lock: tokio::sync::Mutex<()>,
    tx: watch::Sender<SessionView>,
}

impl Service {
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration does not validate.
    pub fn new(
        config: &SessionConfig,
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn SettingsStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (tx, _rx) = watch::channel(SessionView::default());
        Ok(Self {
            provider,
            client_options: config.client_options(),
            login_options: config.login_options()?,
            repo: SettingsRepository::new(store, config.settings_key_prefix.clone()),
            client: RwLock::new(None),
            state: Mutex::new(SessionState::default()),
            login_in_flight: AtomicBool::new(false),
            update_lock: tokio::sync::Mutex::new(()),
            tx,
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().snapshot()
    }

    #[must_use]
    pub fn user_settings(&self) -> UserSettings {
        self.state.lock().settings().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.tx.subscribe()
    }

    pub async fn initialize(&self) -> SessionSnapshot {
        if !self.state.lock().begin_initialize() {
            tracing::debug!("session already initialized; skipping session check");
            return self.snapshot();
        }
        self.publish();

        let mut guard = InitializingGuard {
            svc: self,
            armed: true,
        };

        let restored = match self.restore_session().await {
            Ok(Some(principal)) => {
                let settings = self.repo.find_or_default(&principal).await;
                tracing::info!(%principal, "restored existing session");
                Some((principal, settings))
            }
            Ok(None) => {
                tracing::info!("no existing session");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "session check failed; continuing unauthenticated");
                None
            }
        };

        guard.armed = false;
        self.state.lock().finish_initialize(restored);
        self.publish();
        self.snapshot()
    }

    async fn restore_session(&self) -> Result<Option<Principal>, IdentityError> {
        let client = self.provider.create(&self.client_options).await?;
        *self.client.write() = Some(Arc::clone(&client));

        if !client.is_authenticated().await? {
            return Ok(None);
        }
        client.principal().await.map(Some)
    }

    /// Run one login ceremony and load the principal's settings.
    ///
    /// # Errors
    ///
    /// [`DomainError::ClientNotReady`] before initialization completes,
    /// [`DomainError::LoginInProgress`] while another ceremony runs, or
    /// [`DomainError::Login`] when the identity provider fails it.
    pub async fn login(&self) -> Result<SessionSnapshot, DomainError> {
        let client = self.ready_client()?;
        let _in_flight = LoginInFlight::acquire(&self.login_in_flight)?;

        tracing::info!(
            identity_provider = %self.login_options.identity_provider,
            "starting login ceremony"
        );
        client
            .login(&self.login_options)
            .await
            .map_err(DomainError::Login)?;
        let principal = client.principal().await.map_err(DomainError::Login)?;
        let settings = self.repo.find_or_default(&principal).await;

        tracing::info!(%principal, "login succeeded");
        self.state.lock().authenticate(principal, settings);
        self.publish();
        Ok(self.snapshot())
    }

    /// # Errors
    ///
    /// [`DomainError::ClientNotReady`] before initialization completes, or
    /// [`DomainError::Logout`] when the identity provider fails.
    pub async fn logout(&self) -> Result<SessionSnapshot, DomainError> {
        let client = self.ready_client()?;
        client.logout().await.map_err(DomainError::Logout)?;

        self.state.lock().sign_out();
        tracing::info!("logged out");
        self.publish();
        Ok(self.snapshot())
    }

    /// Persist the record for the current principal, then replace it in memory.
    ///
    /// # Errors
    ///
    /// [`DomainError::Store`] or [`DomainError::Serialization`] if the record
    /// cannot be saved; the in-memory record is left unchanged.
    pub async fn update_user_settings(&self, settings: UserSettings) -> Result<(), DomainError> {
        let _serialized = self.update_lock.lock().await;
        let principal = self.state.lock().principal().cloned();

        match &principal {
            Some(p) => self.repo.save(p, &settings).await?,
            None => tracing::debug!("no principal; settings held in memory only"),
        }

        if self
            .state
            .lock()
            .replace_settings(principal.as_ref(), settings)
        {
            self.publish();
        } else {
            tracing::warn!("session changed during settings update; in-memory record not replaced");
        }
        Ok(())
    }

    fn ready_client(&self) -> Result<Arc<dyn IdentityClient>, DomainError> {
        if !self.state.lock().is_ready() {
            return Err(DomainError::ClientNotReady);
        }
        self.client.read().clone().ok_or(DomainError::ClientNotReady)
    }

    fn publish(&self) {
        let view = self.state.lock().view();
        self.tx.send_replace(view);
    }
}

/// Ends initialization as unauthenticated if `initialize` is dropped mid-check.
struct InitializingGuard<'a> {
    svc: &'a Service,
    armed: bool,
}

impl Drop for InitializingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("initialization cancelled; continuing unauthenticated");
            self.svc.state.lock().finish_initialize(None);
            self.svc.publish();
        }
    }
}

/// Exclusive claim on the login slot, released on drop.
struct LoginInFlight<'a>(&'a AtomicBool);

impl<'a> LoginInFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, DomainError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DomainError::LoginInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for LoginInFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
