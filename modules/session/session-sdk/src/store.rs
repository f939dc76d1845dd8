//! Plugin API for settings persistence.

use async_trait::async_trait;

use crate::error::StoreError;

/// Durable key/value storage supplied by the host environment.
///
/// Keys are derived by the session manager from a fixed prefix and the
/// principal; values are serialized settings records. Implementations only
/// store strings and must not interpret them.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the value under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Must not return before the write is durable from the store's point of
    /// view.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
