//! Error types for the session module and its plugins.

use thiserror::Error;

/// Errors surfaced to session consumers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The identity provider reported an error, or the principal could not
    /// be read after a successful ceremony.
    #[error("login failed: {reason}")]
    LoginFailed { reason: String },

    /// Another login ceremony is still pending.
    #[error("login already in progress")]
    LoginInProgress,

    /// The identity client has not been created yet (not initialized, still
    /// initializing, or creation failed during initialization).
    #[error("identity client not ready")]
    ClientNotReady,

    /// The identity provider failed to terminate the session.
    #[error("logout failed: {reason}")]
    LogoutFailed { reason: String },

    /// The settings record could not be persisted.
    #[error("settings storage error: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl SessionError {
    #[must_use]
    pub fn login_failed(reason: impl Into<String>) -> Self {
        Self::LoginFailed {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn logout_failed(reason: impl Into<String>) -> Self {
        Self::LogoutFailed {
            reason: reason.into(),
        }
    }

    /// Whether the caller can reasonably offer a retry to the user.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::LoginFailed { .. } | Self::LogoutFailed { .. } | Self::Storage(_)
        )
    }
}

/// Errors reported by an identity provider plugin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IdentityError {
    /// The provider's error callback fired (e.g. the user cancelled).
    #[error("{0}")]
    Rejected(String),

    /// The ceremony ended without either callback firing.
    #[error("login ceremony abandoned")]
    Abandoned,

    /// The provider returned a principal that is not valid.
    #[error("invalid principal: {0}")]
    InvalidPrincipal(String),

    /// The provider could not be reached or failed internally.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors reported by a settings store plugin.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("settings store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings store error: {0}")]
    Backend(String),
}
