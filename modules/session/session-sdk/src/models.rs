//! Public models for the session module.
//!
//! These are transport-agnostic data structures shared between the session
//! manager, its plugins, and UI consumers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, stable identifier of an authenticated identity.
///
/// Issued by the identity provider. Always non-empty and free of whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

/// Rejected principal text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrincipalError {
    #[error("principal must not be empty")]
    Empty,
    #[error("principal must not contain whitespace: {0:?}")]
    Whitespace(String),
}

impl Principal {
    /// Parse principal text as returned by an identity provider.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalError`] if the text is empty or contains whitespace.
    pub fn parse(text: impl Into<String>) -> Result<Self, PrincipalError> {
        let text = text.into();
        if text.is_empty() {
            return Err(PrincipalError::Empty);
        }
        if text.chars().any(char::is_whitespace) {
            return Err(PrincipalError::Whitespace(text));
        }
        Ok(Self(text))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Principal {
    type Error = PrincipalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Principal> for String {
    fn from(p: Principal) -> Self {
        p.0
    }
}

impl AsRef<str> for Principal {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle phase of the session.
///
/// `Uninitialized -> Initializing -> {Unauthenticated | Authenticated}`.
/// Logout moves `Authenticated` to `Unauthenticated`, a successful login
/// moves `Unauthenticated` to `Authenticated`. Nothing returns to
/// `Initializing`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Initializing,
    Unauthenticated,
    Authenticated { principal: Principal },
}

/// Point-in-time view of the session state.
///
/// The principal lives inside [`SessionPhase::Authenticated`], so
/// `authenticated() == principal().is_some()` for every value of this type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
}

impl SessionSnapshot {
    #[must_use]
    pub fn new(phase: SessionPhase) -> Self {
        Self { phase }
    }

    #[must_use]
    pub fn authenticated(&self) -> bool {
        matches!(self.phase, SessionPhase::Authenticated { .. })
    }

    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        match &self.phase {
            SessionPhase::Authenticated { principal } => Some(principal),
            _ => None,
        }
    }

    #[must_use]
    pub fn initializing(&self) -> bool {
        matches!(self.phase, SessionPhase::Initializing)
    }

    /// Decide whether a screen with the given access requirement may render.
    ///
    /// Authenticated screens are held back (`Pending`) until the startup
    /// session check has finished, so a restored session is never bounced to sign-in.
    #[must_use]
    pub fn gate(&self, access: Access) -> Gate {
        match (access, &self.phase) {
            (Access::Public, _) | (Access::Authenticated, SessionPhase::Authenticated { .. }) => {
                Gate::Allow
            }
            (Access::Authenticated, SessionPhase::Uninitialized | SessionPhase::Initializing) => {
                Gate::Pending
            }
            (Access::Authenticated, SessionPhase::Unauthenticated) => Gate::RequireSignIn,
        }
    }
}

/// Access requirement of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
}

/// Navigation decision for a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    Allow,
    Pending,
    RequireSignIn,
}

/// What consumers observe through a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub snapshot: SessionSnapshot,
    pub settings: UserSettings,
}

/// Per-principal preference record.
///
/// Stored as camelCase JSON. Every field has a default, so records written by
/// older clients with fewer fields still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSettings {
    pub display_name: String,
    pub email: String,
    pub bio: String,
    pub notifications: NotificationSettings,
    pub privacy: PrivacySettings,
    pub security: SecuritySettings,
    pub preferences: PreferenceSettings,
}

impl UserSettings {
    pub const DEFAULT_DISPLAY_NAME: &'static str = "Anonymous User";
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            display_name: Self::DEFAULT_DISPLAY_NAME.to_owned(),
            email: String::new(),
            bio: String::new(),
            notifications: NotificationSettings::default(),
            privacy: PrivacySettings::default(),
            security: SecuritySettings::default(),
            preferences: PreferenceSettings::default(),
        }
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub proposals: bool,
    pub investments: bool,
    pub marketing: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            proposals: true,
            investments: true,
            marketing: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrivacySettings {
    pub public_profile: bool,
    pub show_portfolio: bool,
    pub show_activity: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            public_profile: true,
            show_portfolio: false,
            show_activity: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecuritySettings {
    pub two_factor: bool,
    pub login_alerts: bool,
    pub transaction_confirmation: bool,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            two_factor: false,
            login_alerts: true,
            transaction_confirmation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreferenceSettings {
    pub language: String,
    pub currency: String,
    pub timezone: String,
    pub theme: String,
}

impl Default for PreferenceSettings {
    fn default() -> Self {
        Self {
            language: "en".to_owned(),
            currency: "USD".to_owned(),
            timezone: "UTC".to_owned(),
            theme: "dark".to_owned(),
        }
    }
}
