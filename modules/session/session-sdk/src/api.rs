//! Public API trait for session consumers.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::SessionError;
use crate::models::{SessionSnapshot, SessionView, UserSettings};

/// Session operations exposed to UI consumers.
///
/// One instance exists per application. The hosting shell calls
/// [`initialize`](Self::initialize) once at startup and passes the same
/// handle to every screen.
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// Current session state.
    fn snapshot(&self) -> SessionSnapshot;

    /// Current in-memory settings record.
    fn user_settings(&self) -> UserSettings;

    /// Receiver that observes every state or settings change.
    fn subscribe(&self) -> watch::Receiver<SessionView>;

    /// Ask the identity provider for an existing session.
    ///
    /// Never fails: provider errors are logged and leave the session
    /// unauthenticated. Calls after the first return the current snapshot
    /// without probing again.
    async fn initialize(&self) -> SessionSnapshot;

    /// Run the interactive login ceremony.
    ///
    /// # Errors
    ///
    /// - [`SessionError::LoginFailed`] if the provider reports an error
    /// - [`SessionError::LoginInProgress`] if another login is pending
    /// - [`SessionError::ClientNotReady`] if no identity client exists yet
    async fn login(&self) -> Result<SessionSnapshot, SessionError>;

    /// End the session. The persisted settings record is kept.
    ///
    /// # Errors
    ///
    /// - [`SessionError::LogoutFailed`] if the provider could not end the
    ///   session; the session stays authenticated
    /// - [`SessionError::ClientNotReady`] if no identity client exists yet
    async fn logout(&self) -> Result<SessionSnapshot, SessionError>;

    /// Replace the settings record, persisting it when a principal is set.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if the record could not be
    /// persisted; the in-memory record is then left unchanged.
    async fn update_user_settings(&self, settings: UserSettings) -> Result<(), SessionError>;
}
