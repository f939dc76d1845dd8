use session_sdk::{IdentityError, SessionError, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("login rejected by identity provider: {0}")]
    Login(#[source] IdentityError),

    #[error("identity provider failed to end the session: {0}")]
    Logout(#[source] IdentityError),

    #[error("login already in progress")]
    LoginInProgress,

    #[error("identity client not ready")]
    ClientNotReady,

    #[error("settings store error: {0}")]
    Store(#[from] StoreError),

    #[error("settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<DomainError> for SessionError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Login(source) => Self::login_failed(source.to_string()),
            DomainError::Logout(source) => Self::logout_failed(source.to_string()),
            DomainError::LoginInProgress => Self::LoginInProgress,
            DomainError::ClientNotReady => Self::ClientNotReady,
            DomainError::Store(source) => Self::Storage(source.to_string()),
            DomainError::Serialization(source) => Self::Internal(source.to_string()),
        }
    }
}
