//! Configuration for the session module.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use session_sdk::{ClientOptions, LoginOptions};
use thiserror::Error;
use url::Url;

/// Network the identity provider lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    /// Local replica with a locally deployed identity canister.
    #[default]
    Local,
    /// Production network.
    Ic,
}

impl Network {
    /// Map a `DFX_NETWORK` value. Anything but `ic` is treated as local.
    #[must_use]
    pub fn from_dfx_network(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("ic") {
            Self::Ic
        } else {
            Self::Local
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field} URL '{value}': {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        source: url::ParseError,
    },

    #[error("settings_key_prefix must not be empty")]
    EmptyKeyPrefix,

    #[error("max_time_to_live must be greater than zero")]
    ZeroTimeToLive,

    #[error("identity_canister_id must not be empty on the local network")]
    EmptyCanisterId,
}

/// Module configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub network: Network,

    /// Base URL of the local replica.
    pub local_replica_url: String,

    /// Identity canister on the local replica.
    pub identity_canister_id: String,

    /// Identity provider on the production network.
    pub production_identity_url: String,

    /// Maximum delegation lifetime requested at login.
    #[serde(with = "humantime_duration")]
    pub max_time_to_live: Duration,

    /// Window features for the login popup.
    pub window_opener_features: String,

    /// Keep the session alive regardless of user inactivity.
    pub disable_idle_timeout: bool,

    /// Prefix of settings store keys; the principal is appended.
    pub settings_key_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            network: Network::Local,
            local_replica_url: "http://localhost:4943".to_owned(),
            identity_canister_id: "rdmx6-jaaaa-aaaaa-aaadq-cai".to_owned(),
            production_identity_url: "https://identity.ic0.app".to_owned(),
            max_time_to_live: Duration::from_secs(7 * 24 * 60 * 60),
            window_opener_features:
                "toolbar=0,location=0,menubar=0,width=500,height=500,left=100,top=100".to_owned(),
            disable_idle_timeout: true,
            settings_key_prefix: "userSettings_".to_owned(),
        }
    }
}

impl SessionConfig {
    /// Check that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an empty key prefix, a zero lifetime, or
    /// an identity provider URL that does not parse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.settings_key_prefix.is_empty() {
            return Err(ConfigError::EmptyKeyPrefix);
        }
        if self.max_time_to_live.is_zero() {
            return Err(ConfigError::ZeroTimeToLive);
        }
        self.identity_provider_url().map(|_| ())
    }

    /// Identity provider URL for the configured network.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the configured URL does not
    /// parse, or [`ConfigError::EmptyCanisterId`] on the local network
    /// without a canister id.
    pub fn identity_provider_url(&self) -> Result<Url, ConfigError> {
        match self.network {
            Network::Ic => parse_url("production_identity_url", &self.production_identity_url),
            Network::Local => {
                if self.identity_canister_id.trim().is_empty() {
                    return Err(ConfigError::EmptyCanisterId);
                }
                let mut url = parse_url("local_replica_url", &self.local_replica_url)?;
                url.query_pairs_mut()
                    .append_pair("canisterId", self.identity_canister_id.trim());
                Ok(url)
            }
        }
    }

    /// Options for one login ceremony.
    ///
    /// # Errors
    ///
    /// Propagates [`identity_provider_url`](Self::identity_provider_url) errors.
    pub fn login_options(&self) -> Result<LoginOptions, ConfigError> {
        Ok(LoginOptions {
            identity_provider: self.identity_provider_url()?,
            max_time_to_live: self.max_time_to_live,
            window_opener_features: self.window_opener_features.clone(),
        })
    }

    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            disable_idle_timeout: self.disable_idle_timeout,
            disable_default_idle_callback: self.disable_idle_timeout,
        }
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: value.to_owned(),
        source,
    })
}

/// `Duration` as a humantime string (`"7days"`, `"12h 30m"`).
mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&humantime::format_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(d)?;
        humantime::parse_duration(&text).map_err(de::Error::custom)
    }
}
