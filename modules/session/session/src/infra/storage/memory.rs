use async_trait::async_trait;
use dashmap::DashMap;
use session_sdk::{SettingsStore, StoreError};

/// Process-local settings store. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    entries: DashMap<String, String>,
}

impl InMemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
