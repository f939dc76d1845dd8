//! Layered shell configuration.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. YAML file passed with `--config`
//! 3. `DFX_NETWORK` (`ic` selects the production network)
//! 4. `DAOVERSE__*` environment variables, `__` separating nested keys
//!    (`DAOVERSE__SESSION__MAX_TIME_TO_LIVE=1day`)
//! 5. CLI flags, applied by the caller

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use session::{Network, SessionConfig, StaticIdentityConfig};

pub const ENV_PREFIX: &str = "DAOVERSE__";
pub const DFX_NETWORK_VAR: &str = "DFX_NETWORK";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub identity: StaticIdentityConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Settings directory. Defaults to `daoverse/settings` under the
    /// platform data directory.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when neither `-v` nor `RUST_LOG` is given.
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load defaults, then the optional YAML file, then the environment.
    ///
    /// # Errors
    ///
    /// Fails if an explicit config file is missing, a source does not
    /// parse, or the merged session configuration does not validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        if let Ok(value) = std::env::var(DFX_NETWORK_VAR) {
            figment = figment.merge(Serialized::default(
                "session.network",
                Network::from_dfx_network(&value),
            ));
        }

        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")?;

        config
            .session
            .validate()
            .context("invalid session configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::time::Duration;

    fn write_yaml(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("daoverse.yaml");
        std::fs::write(&path, body).unwrap();
        path
    }

    fn load_clean(path: Option<&Path>) -> Result<AppConfig> {
        temp_env::with_vars_unset(
            [
                DFX_NETWORK_VAR,
                "DAOVERSE__SESSION__NETWORK",
                "DAOVERSE__LOGGING__LEVEL",
            ],
            || AppConfig::load(path),
        )
    }

    #[test]
    fn defaults_without_file() {
        let config = load_clean(None).unwrap();
        assert_eq!(config.session.network, Network::Local);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_clean(Some(Path::new("/nonexistent/daoverse.yaml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn yaml_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_yaml(
            &dir,
            r#"
session:
  network: ic
  max_time_to_live: 1day
storage:
  backend: memory
identity:
  principal: "aaaaa-aa"
"#,
        );

        let config = load_clean(Some(&path)).unwrap();
        assert_eq!(config.session.network, Network::Ic);
        assert_eq!(
            config.session.max_time_to_live,
            Duration::from_secs(24 * 60 * 60)
        );
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.identity.principal, "aaaaa-aa");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_yaml(&dir, "session:\n  nework: ic\n");
        assert!(load_clean(Some(&path)).is_err());
    }

    #[test]
    fn dfx_network_selects_production() {
        let config = temp_env::with_vars(
            [
                (DFX_NETWORK_VAR, Some("ic")),
                ("DAOVERSE__SESSION__NETWORK", None),
            ],
            || AppConfig::load(None),
        )
        .unwrap();
        assert_eq!(config.session.network, Network::Ic);
    }

    #[test]
    fn prefixed_env_beats_dfx_network() {
        let config = temp_env::with_vars(
            [
                (DFX_NETWORK_VAR, Some("ic")),
                ("DAOVERSE__SESSION__NETWORK", Some("local")),
                ("DAOVERSE__LOGGING__LEVEL", Some("debug")),
            ],
            || AppConfig::load(None),
        )
        .unwrap();
        assert_eq!(config.session.network, Network::Local);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn invalid_session_config_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_yaml(&dir, "session:\n  settings_key_prefix: \"\"\n");
        let err = load_clean(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("settings_key_prefix"));
    }
}
