//! Session Module Implementation
//!
//! The public API is defined in `session-sdk` and re-exported here.
//!
//! ```ignore
//! let config = SessionConfig::default();
//! let module = SessionModule::new(
//!     &config,
//!     Arc::new(StaticIdentityProvider::new(StaticIdentityConfig::default())),
//!     Arc::new(FileSettingsStore::open_default()?),
//! )?;
//! let client = module.client();
//! client.initialize().await;
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub use session_sdk::{
    Access, Gate, IdentityClient, IdentityError, IdentityProvider, Principal, SessionClient,
    SessionError, SessionSnapshot, SessionView, SettingsStore, StoreError, UserSettings,
};

pub mod config;
pub mod module;

pub use config::{Network, SessionConfig};
pub use infra::identity::{StaticIdentityConfig, StaticIdentityProvider};
pub use infra::storage::{FileSettingsStore, InMemorySettingsStore};
pub use module::SessionModule;

#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
