//! Settings store backed by one JSON file per key.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use session_sdk::{SettingsStore, StoreError};

/// Directory of `<key>.json` files.
///
/// Keys are escaped into safe file names: ASCII letters, digits, `-` and `_`
/// are kept, every other byte becomes `%XX`. Each write goes to its own
/// temporary file that is renamed over the target, so readers never see a
/// partial record and concurrent writers never share a temp file.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    dir: PathBuf,
}

impl FileSettingsStore {
    /// Open (and create if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Open the store under the platform data directory
    /// (`$XDG_DATA_HOME/daoverse/settings` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the platform has no data directory,
    /// or [`StoreError::Io`] if it cannot be created.
    pub fn open_default() -> Result<Self, StoreError> {
        let base = dirs::data_dir()
            .ok_or_else(|| StoreError::Backend("no platform data directory".into()))?;
        Self::open(base.join("daoverse").join("settings"))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", escape_key(key)))
    }
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
            out.push(char::from(b));
        } else {
            out.push('%');
            out.push(char::from(HEX[usize::from(b >> 4)]));
            out.push(char::from(HEX[usize::from(b & 0x0F)]));
        }
    }
    out
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let dir = self.dir.clone();
        let target = self.path_for(key);
        let value = value.to_owned();

        tokio::task::spawn_blocking(move || write_atomic(&dir, &target, &value))
            .await
            .map_err(|e| StoreError::Backend(format!("settings write task failed: {e}")))??;
        Ok(())
    }
}

/// Write through a temp file unique to this call, then rename it over `target`.
fn write_atomic(dir: &Path, target: &Path, value: &str) -> Result<(), StoreError> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".settings-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(value.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| StoreError::Io(e.error))?;
    tracing::trace!(path = %target.display(), "settings record written");
    Ok(())
}
