//! Session SDK
//!
//! This crate provides the public API for the `session` module:
//!
//! - [`SessionClient`] - Public API trait for UI consumers
//! - [`IdentityProvider`], [`IdentityClient`] - Plugin API for identity providers
//! - [`SettingsStore`] - Plugin API for key/value persistence
//! - [`LoginCeremony`] - Adapter from callback-style login flows to a future
//! - [`Principal`], [`SessionSnapshot`], [`UserSettings`] - Models
//! - [`SessionError`], [`IdentityError`], [`StoreError`] - Error types
//!
//! ## Usage
//!
//! The hosting shell builds the session module once and hands the client to
//! every consumer:
//!
//! ```ignore
//! use session_sdk::{Access, Gate, SessionClient};
//!
//! let client: Arc<dyn SessionClient> = module.client();
//! client.initialize().await;
//!
//! match client.snapshot().gate(Access::Authenticated) {
//!     Gate::Allow => render_dashboard(&client.user_settings()),
//!     Gate::Pending => render_spinner(),
//!     Gate::RequireSignIn => client.login().await?,
//! }
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod ceremony;
pub mod error;
pub mod identity;
pub mod models;
pub mod store;

pub use api::SessionClient;
pub use ceremony::{LoginCallbacks, LoginCeremony};
pub use error::{IdentityError, SessionError, StoreError};
pub use identity::{ClientOptions, IdentityClient, IdentityProvider, LoginOptions};
pub use models::{
    Access, Gate, NotificationSettings, PreferenceSettings, Principal, PrincipalError,
    PrivacySettings, SecuritySettings, SessionPhase, SessionSnapshot, SessionView, UserSettings,
};
pub use store::SettingsStore;
