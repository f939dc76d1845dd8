//! Plugin API for identity providers.
//!
//! The session manager treats the identity provider as an opaque capability:
//! it creates one client at startup and drives every authentication step
//! through it. All cryptography and the interactive ceremony itself live on
//! the provider side.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::IdentityError;
use crate::models::Principal;

/// Options for creating an identity client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Do not log the user out after a period of inactivity.
    pub disable_idle_timeout: bool,
    /// Do not install the provider's default idle callback (page reload).
    pub disable_default_idle_callback: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            disable_idle_timeout: true,
            disable_default_idle_callback: true,
        }
    }
}

/// Parameters of one interactive login ceremony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOptions {
    /// Where the ceremony takes place.
    pub identity_provider: Url,
    /// Maximum lifetime of the delegation issued by the provider.
    pub max_time_to_live: Duration,
    /// Window features for the authentication popup.
    pub window_opener_features: String,
}

impl LoginOptions {
    /// `max_time_to_live` in nanoseconds, saturating at `u64::MAX`.
    #[must_use]
    pub fn max_time_to_live_nanos(&self) -> u64 {
        u64::try_from(self.max_time_to_live.as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Factory for identity clients.
///
/// Called once by the session manager during initialization.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Materialize a client.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Unavailable`] if the client cannot be built.
    async fn create(&self, options: &ClientOptions)
    -> Result<Arc<dyn IdentityClient>, IdentityError>;
}

/// A live identity client.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Whether a valid session already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot answer.
    async fn is_authenticated(&self) -> Result<bool, IdentityError>;

    /// Principal of the current identity.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidPrincipal`] if the provider's identity
    /// does not carry a usable principal.
    async fn principal(&self) -> Result<Principal, IdentityError>;

    /// Run the interactive login ceremony.
    ///
    /// May stay pending for as long as the user takes. Resolves exactly once:
    /// `Ok(())` for the success callback, `Err` for the error callback.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Rejected`] with the provider's reason when the
    /// ceremony fails.
    async fn login(&self, options: &LoginOptions) -> Result<(), IdentityError>;

    /// Terminate the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider could not end the session.
    async fn logout(&self) -> Result<(), IdentityError>;
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn seven_days_in_nanos() {
        let opts = LoginOptions {
            identity_provider: Url::parse("https://identity.ic0.app").unwrap(),
            max_time_to_live: Duration::from_secs(7 * 24 * 60 * 60),
            window_opener_features: String::new(),
        };
        assert_eq!(opts.max_time_to_live_nanos(), 604_800_000_000_000);
    }

    #[test]
    fn nanos_saturate() {
        let opts = LoginOptions {
            identity_provider: Url::parse("https://identity.ic0.app").unwrap(),
            max_time_to_live: Duration::MAX,
            window_opener_features: String::new(),
        };
        assert_eq!(opts.max_time_to_live_nanos(), u64::MAX);
    }

    #[test]
    fn client_options_disable_idle_logout_by_default() {
        let opts = ClientOptions::default();
        assert!(opts.disable_idle_timeout);
        assert!(opts.disable_default_idle_callback);
    }
}
