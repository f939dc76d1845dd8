//! Local (in-process) client for the session module.

use std::sync::Arc;

use async_trait::async_trait;
use session_sdk::{SessionClient, SessionError, SessionSnapshot, SessionView, UserSettings};
use tokio::sync::watch;

use super::{DomainError, Service};

/// Local client wrapping the session service.
///
/// Handed to UI consumers by [`SessionModule::client`](crate::SessionModule::client).
pub struct SessionLocalClient {
    svc: Arc<Service>,
}

impl SessionLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> SessionError {
    tracing::error!(operation = op, error = %e, "session call failed");
    e.into()
}

#[async_trait]
impl SessionClient for SessionLocalClient {
    fn snapshot(&self) -> SessionSnapshot {
        self.svc.snapshot()
    }

    fn user_settings(&self) -> UserSettings {
        self.svc.user_settings()
    }

    fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.svc.subscribe()
    }

    async fn initialize(&self) -> SessionSnapshot {
        self.svc.initialize().await
    }

    async fn login(&self) -> Result<SessionSnapshot, SessionError> {
        self.svc
            .login()
            .await
            .map_err(|e| log_and_convert("login", e))
    }

    async fn logout(&self) -> Result<SessionSnapshot, SessionError> {
        self.svc
            .logout()
            .await
            .map_err(|e| log_and_convert("logout", e))
    }

    async fn update_user_settings(&self, settings: UserSettings) -> Result<(), SessionError> {
        self.svc
            .update_user_settings(settings)
            .await
            .map_err(|e| log_and_convert("update_user_settings", e))
    }
}
