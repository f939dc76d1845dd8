use std::sync::Arc;

use session_sdk::{Principal, SettingsStore, UserSettings};

use super::error::DomainError;

/// Per-principal settings records on top of a raw key/value store.
pub struct SettingsRepository {
    store: Arc<dyn SettingsStore>,
    key_prefix: String,
}

impl SettingsRepository {
    #[must_use]
    pub fn new(store: Arc<dyn SettingsStore>, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
        }
    }

    #[must_use]
    pub fn key(&self, principal: &Principal) -> String {
        format!("{}{principal}", self.key_prefix)
    }

    /// Stored record for `principal`.
    ///
    /// A record that no longer parses is reported as absent.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Store`] if the backend read fails.
    pub async fn find(&self, principal: &Principal) -> Result<Option<UserSettings>, DomainError> {
        let key = self.key(principal);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(settings) => Ok(Some(settings)),
            Err(e) => {
                tracing::warn!(%key, error = %e, "discarding unreadable settings record");
                Ok(None)
            }
        }
    }

    /// Stored record for `principal`, or defaults if absent or unreadable.
    pub async fn find_or_default(&self, principal: &Principal) -> UserSettings {
        match self.find(principal).await {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                tracing::debug!(%principal, "no stored settings; using defaults");
                UserSettings::default()
            }
            Err(e) => {
                tracing::warn!(%principal, error = %e, "failed to load settings; using defaults");
                UserSettings::default()
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`DomainError`] if the record cannot be encoded or written.
    pub async fn save(
        &self,
        principal: &Principal,
        settings: &UserSettings,
    ) -> Result<(), DomainError> {
        let value = serde_json::to_string(settings)?;
        self.store.set(&self.key(principal), &value).await?;
        Ok(())
    }
}
